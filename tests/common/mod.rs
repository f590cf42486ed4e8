//! Synthetic PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Font size used for every text run.
pub const FONT_SIZE: i64 = 12;

/// One positioned run of text, in PDF user space (origin bottom-left).
#[derive(Debug, Clone)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

pub fn run(x: f32, y: f32, text: &str) -> TextRun {
    TextRun {
        x,
        y,
        text: text.to_string(),
    }
}

/// Runs stacked 14 points apart from the top of a Letter page.
pub fn column(lines: &[(f32, &str)]) -> Vec<TextRun> {
    lines
        .iter()
        .enumerate()
        .map(|(i, (x, text))| run(*x, 700.0 - 14.0 * i as f32, text))
        .collect()
}

fn page_operations(runs: &[TextRun]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for r in runs {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)],
        ));
        ops.push(Operation::new("Td", vec![Object::Real(r.x), Object::Real(r.y)]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(r.text.as_str())]));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

/// Build a Letter-sized PDF with one page per entry of `pages`.
pub fn build_pdf(pages: &[Vec<TextRun>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for runs in pages {
        let content = Content {
            operations: page_operations(runs),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("pdf serializes");
    buffer
}

/// Write a fixture PDF into `dir` and return its path.
pub fn write_pdf(dir: &std::path::Path, name: &str, pages: &[Vec<TextRun>]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).expect("fixture written");
    path
}

/// Re-point page `page_num`'s `Contents` at a dictionary instead of a stream.
pub fn break_page_contents(pdf: &[u8], page_num: u32) -> Vec<u8> {
    let mut doc = Document::load_mem(pdf).expect("fixture parses");
    let page_id = doc.get_pages()[&page_num];
    let not_a_stream = doc.add_object(dictionary! {
        "Type" => "NotAStream",
    });
    doc.get_dictionary_mut(page_id)
        .expect("page dictionary")
        .set("Contents", not_a_stream);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("pdf serializes");
    buffer
}

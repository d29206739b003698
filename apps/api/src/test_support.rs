//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lopdf::{dictionary, Document, Object, Stream};

use crate::llm_client::{LlmError, TextGenerator};

/// Builds a PDF with one page per entry. `None` produces a page with an empty
/// content stream, standing in for a scanned image page.
pub fn make_test_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    save(build_document(pages))
}

/// Same as `make_test_pdf` but with an AES (`/V 4`) standard security handler
/// declared in the trailer, which neither extractor can open.
pub fn make_encrypted_test_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = build_document(pages);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 4,
        "R" => 4,
        "Length" => 128,
        "O" => Object::string_literal(vec![0u8; 32]),
        "U" => Object::string_literal(vec![0u8; 32]),
        "P" => -4,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    save(doc)
}

fn build_document(pages: &[Option<&str>]) -> Document {
    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let content = match page {
            Some(text) => format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET"),
            None => String::new(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Scripted `TextGenerator`: answers per model and records every call.
pub struct FakeGenerator {
    responder: Box<dyn Fn(&str, &str) -> Result<String, LlmError> + Send + Sync>,
    calls: AtomicUsize,
    models_called: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            models_called: Mutex::new(Vec::new()),
        })
    }

    /// Always answers with `text`.
    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::new(move |_, _| Ok(text.clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn models_called(&self) -> Vec<String> {
        self.models_called.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models_called.lock().unwrap().push(model.to_string());
        (self.responder)(model, prompt)
    }
}

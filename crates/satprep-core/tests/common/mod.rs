//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use satprep_core::{
    DocumentLoader, Embedder, GenerationOptions, Generator, LoadedDocument, Result, SatPrepError,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Loader that derives page text from the file name and fails on chosen names
#[derive(Default)]
pub struct FakeLoader {
    pub fail_on: Vec<String>,
    pub chars_per_file: usize,
    pub calls: AtomicUsize,
}

impl FakeLoader {
    pub fn new(chars_per_file: usize) -> Self {
        Self {
            chars_per_file,
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on.push(name.to_string());
        self
    }
}

#[async_trait]
impl DocumentLoader for FakeLoader {
    fn loader_type(&self) -> &'static str {
        "fake"
    }

    async fn load(&self, path: &Path) -> Result<LoadedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if self.fail_on.contains(&name) {
            return Err(SatPrepError::Pdf(format!("corrupt file {}", name)));
        }
        let text: String = name.chars().cycle().take(self.chars_per_file).collect();
        Ok(LoadedDocument::new(path.to_path_buf(), vec![text]))
    }
}

/// Embedder mapping text onto a small fixed-dimension vector by keyword
#[derive(Default)]
pub struct KeywordEmbedder {
    pub batch_calls: AtomicUsize,
    pub single_calls: AtomicUsize,
}

pub const KEYWORDS: [&str; 3] = ["inequal", "circle", "ratio"];

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    let mut v: Vec<f32> = KEYWORDS
        .iter()
        .map(|k| lower.matches(k).count() as f32)
        .collect();
    v.push(0.1);
    v
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        Ok(keyword_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| keyword_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        KEYWORDS.len() + 1
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

/// Embedder that always fails, as when the provider is unreachable
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(SatPrepError::Provider("embedding service down".into()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(SatPrepError::Provider("embedding service down".into()))
    }

    fn dimensions(&self) -> usize {
        4
    }

    fn model_name(&self) -> &str {
        "down"
    }
}

/// Generator returning a canned reply and recording prompts
pub struct ScriptedGenerator {
    pub reply: String,
    pub prompts: Mutex<Vec<String>>,
    pub options: Mutex<Vec<GenerationOptions>>,
}

impl ScriptedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
            options: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.options.lock().unwrap().push(options.clone());
        Ok(self.reply.clone())
    }
}

/// Create empty files at the given relative paths
pub fn touch_all(root: &Path, rel_paths: &[&str]) -> Vec<PathBuf> {
    rel_paths
        .iter()
        .map(|rel| {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, b"%PDF-1.4").unwrap();
            path
        })
        .collect()
}

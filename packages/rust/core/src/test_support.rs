//! In-memory doubles for the pipeline collaborators.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use preprint_llm::ChatModel;
use preprint_shared::{Paper, PreprintError, Result};

use crate::sources::{ContentSource, PaperSource};

pub fn paper(id: &str, title: &str) -> Paper {
    Paper {
        arxiv_id: id.into(),
        title: title.into(),
        authors: vec!["Ada Lovelace".into(), "Alan Turing".into()],
        abstract_text: format!("Abstract of {title}."),
        link: format!("https://arxiv.org/abs/{id}"),
    }
}

/// A model whose reply is computed from the user message.
pub struct FnModel<F> {
    reply: F,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

impl<F> FnModel<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    pub fn new(reply: F) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(system, user)` pairs in call order.
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> ChatModel for FnModel<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        (self.reply)(user)
    }
}

/// A model that always replies with the same text.
pub fn fixed_model(
    reply: &str,
) -> FnModel<impl Fn(&str) -> Result<String> + Send + Sync + use<>> {
    let reply = reply.to_string();
    FnModel::new(move |_| Ok(reply.clone()))
}

/// A model that always fails.
pub fn failing_model() -> FnModel<impl Fn(&str) -> Result<String> + Send + Sync> {
    FnModel::new(|_| Err(PreprintError::Llm("quota exceeded".into())))
}

pub struct StaticPapers(pub Result<Vec<Paper>>);

#[async_trait]
impl PaperSource for StaticPapers {
    async fn fetch_papers(&self) -> Result<Vec<Paper>> {
        match &self.0 {
            Ok(papers) => Ok(papers.clone()),
            Err(e) => Err(PreprintError::Network(e.to_string())),
        }
    }
}

/// Full text by paper id. Missing ids have no full text; ids in `errors` fail.
#[derive(Default)]
pub struct MapContent {
    pub texts: HashMap<String, String>,
    pub errors: Vec<String>,
}

#[async_trait]
impl ContentSource for MapContent {
    async fn fetch_content(&self, paper: &Paper) -> Result<Option<String>> {
        if self.errors.contains(&paper.arxiv_id) {
            return Err(PreprintError::Network(format!("{}: HTTP 500", paper.arxiv_id)));
        }
        Ok(self.texts.get(&paper.arxiv_id).cloned())
    }
}

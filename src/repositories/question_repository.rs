//! The authored question list and its persisted mirror.
//!
//! Every mutation reads the full collection from storage, changes it in
//! memory and writes the whole collection back. The repository keeps the last
//! list it saw so consumers can render without touching storage, and pushes
//! that list to subscribers after each successful change.

use std::sync::Arc;

use futures_channel::mpsc::UnboundedReceiver;
use log::{info, warn};
use serde_json::{Map, Value};

use crate::{
    error::{QuizError, Result},
    helpers::{load_collection, read_collection, remove_at, save_collection},
    models::question::{Question, QuestionKind},
    storage::{Storage, QUESTIONS_KEY},
    subscribers::SubscriberMap,
};

pub const EXPORT_FILE_NAME: &str = "questions.json";

pub struct QuestionRepository {
    storage: Arc<dyn Storage>,
    questions: Vec<Question>,
    subscribers: SubscriberMap<Vec<Question>>,
}

impl QuestionRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            questions: Vec::new(),
            subscribers: SubscriberMap::default(),
        }
    }

    /// The list as of the last load or mutation.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Loads the persisted collection. Missing or corrupt data yields an empty list.
    pub async fn list(&mut self) -> Vec<Question> {
        self.questions = load_collection(self.storage.as_ref(), QUESTIONS_KEY).await;
        self.questions.clone()
    }

    /// Re-reads storage and pushes the fresh list to subscribers.
    pub async fn reload(&mut self) -> &[Question] {
        self.list().await;
        self.subscribers.broadcast_all(&self.questions);
        &self.questions
    }

    pub async fn add(&mut self, question: Question) -> Result<Vec<Question>> {
        let question = question.normalized();
        question.validate()?;

        let mut questions = self.read().await?;
        questions.push(question);
        self.persist(questions).await
    }

    pub async fn update(&mut self, position: usize, question: Question) -> Result<Vec<Question>> {
        let question = question.normalized();
        question.validate()?;

        let mut questions = self.read().await?;
        let len = questions.len();
        let slot = questions
            .get_mut(position)
            .ok_or(QuizError::OutOfRange { position, len })?;
        *slot = question;
        self.persist(questions).await
    }

    pub async fn delete(&mut self, position: usize) -> Result<Vec<Question>> {
        let mut questions = self.read().await?;
        let removed = remove_at(&mut questions, position)?;
        info!("Deleting question at {}: {}", position, removed.text);
        self.persist(questions).await
    }

    /// Pretty-printed JSON array of every stored question.
    pub async fn export_all(&mut self) -> Result<String> {
        let questions = self.list().await;
        if questions.is_empty() {
            return Err(QuizError::EmptyCollection);
        }
        Ok(serde_json::to_string_pretty(&questions)?)
    }

    /// Replaces the whole collection with the questions in `payload`.
    /// Nothing is written unless every record is valid.
    pub async fn import_all(&mut self, payload: &str) -> Result<Vec<Question>> {
        let questions = parse_import(payload)?;
        info!("Importing {} questions", questions.len());
        self.persist(questions).await
    }

    pub fn subscribe(&mut self) -> (String, UnboundedReceiver<Vec<Question>>) {
        self.subscribers.attach()
    }

    pub fn unsubscribe(&mut self, id: &str) -> bool {
        self.subscribers.detach(id)
    }

    async fn read(&self) -> Result<Vec<Question>> {
        let read = read_collection(self.storage.as_ref(), QUESTIONS_KEY).await;
        if let Err(error) = &read {
            warn!("Reading questions failed: {}", error);
        }
        read
    }

    async fn persist(&mut self, questions: Vec<Question>) -> Result<Vec<Question>> {
        let saved = save_collection(self.storage.as_ref(), QUESTIONS_KEY, &questions).await;
        if let Err(error) = saved {
            warn!("Saving questions failed: {}", error);
            return Err(error);
        }
        self.questions = questions;
        self.subscribers.broadcast_all(&self.questions);
        Ok(self.questions.clone())
    }
}

pub fn parse_import(payload: &str) -> Result<Vec<Question>> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| QuizError::MalformedPayload(e.to_string()))?;
    let records = match value {
        Value::Array(records) => records,
        _ => {
            return Err(QuizError::MalformedPayload(
                "expected a JSON array of questions".to_string(),
            ))
        }
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            parse_record(record).map_err(|reason| QuizError::InvalidRecord { index, reason })
        })
        .collect()
}

fn field<'a>(record: &'a Map<String, Value>, name: &str, legacy: &str) -> Option<&'a Value> {
    record.get(name).or_else(|| record.get(legacy))
}

fn parse_record(record: &Value) -> std::result::Result<Question, String> {
    let record = record.as_object().ok_or("not an object")?;

    let text = field(record, "text", "question")
        .and_then(Value::as_str)
        .ok_or("`text` must be a string")?;

    let kind = field(record, "kind", "type")
        .and_then(Value::as_str)
        .ok_or("`kind` must be a string")?;
    let kind: QuestionKind = serde_json::from_value(Value::String(kind.to_string()))
        .map_err(|_| format!("unknown question kind `{kind}`"))?;

    let options = record
        .get("options")
        .and_then(Value::as_array)
        .ok_or("`options` must be an array")?
        .iter()
        .map(|opt| opt.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
        .ok_or("every option must be a string")?;

    let correct_index = record
        .get("correctIndex")
        .ok_or("`correctIndex` is missing")?;
    if !correct_index.is_number() {
        return Err("`correctIndex` must be a number".to_string());
    }
    let correct_index = correct_index
        .as_u64()
        .and_then(|index| usize::try_from(index).ok())
        .filter(|index| *index < options.len())
        .ok_or_else(|| {
            format!(
                "`correctIndex` {} is outside the {} options",
                correct_index,
                options.len()
            )
        })?;

    Ok(Question {
        text: text.to_string(),
        kind,
        options,
        correct_index,
    }
    .normalized())
}

use std::{collections::HashSet, sync::Arc};

use log::{info, warn};

use crate::{
    error::Result,
    helpers::{load_collection, read_collection, remove_at, save_collection},
    models::score::Score,
    storage::{Storage, SCORES_KEY},
};

pub struct ScoreRepository {
    storage: Arc<dyn Storage>,
    view: Vec<Score>,
    /// The collection `view` was derived from, in stored order.
    source: Vec<Score>,
    /// `source` index of each `view` entry.
    order: Vec<usize>,
}

impl ScoreRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            view: Vec::new(),
            source: Vec::new(),
            order: Vec::new(),
        }
    }

    /// The list most recently handed out by `list`, `deduplicated_view` or `ranking`.
    /// `delete` positions refer to this list.
    pub fn view(&self) -> &[Score] {
        &self.view
    }

    pub async fn list(&mut self) -> Vec<Score> {
        let scores = load_collection(self.storage.as_ref(), SCORES_KEY).await;
        self.show(scores, false);
        self.view.clone()
    }

    /// Appends `score` unless a record with the same (name, points, total)
    /// is already stored. Returns whether anything was written.
    pub async fn append(&mut self, score: Score) -> Result<bool> {
        let mut scores: Vec<Score> = read_collection(self.storage.as_ref(), SCORES_KEY).await?;

        if scores
            .iter()
            .any(|existing| existing.identity_key() == score.identity_key())
        {
            info!("Score already recorded: {}", score);
            return Ok(false);
        }

        info!("Recording score: {}", score);
        scores.push(score);
        save_collection(self.storage.as_ref(), SCORES_KEY, &scores).await?;
        Ok(true)
    }

    /// Removes the record at `position` of the current view. What gets stored
    /// is the collection that view was built from, in its own order, minus
    /// that record.
    pub async fn delete(&mut self, position: usize) -> Result<Vec<Score>> {
        let mut view = self.view.clone();
        let removed = remove_at(&mut view, position)?;
        let index = self.order[position];

        let mut scores = self.source.clone();
        scores.remove(index);

        if let Err(error) = save_collection(self.storage.as_ref(), SCORES_KEY, &scores).await {
            warn!("Deleting score {} failed: {}", removed, error);
            return Err(error);
        }
        info!("Deleted score: {}", removed);

        self.source = scores;
        self.view = view;
        self.order.remove(position);
        for slot in self.order.iter_mut().filter(|slot| **slot > index) {
            *slot -= 1;
        }
        Ok(self.view.clone())
    }

    /// Stored scores with identical records collapsed onto their most recent
    /// occurrence. Storage is left untouched.
    pub async fn deduplicated_view(&mut self) -> Vec<Score> {
        let scores: Vec<Score> = load_collection(self.storage.as_ref(), SCORES_KEY).await;
        self.show(deduplicate(scores), false);
        self.view.clone()
    }

    /// The de-duplicated view ordered by points, best first. Equal points keep
    /// their stored order. Only the presentation is sorted.
    pub async fn ranking(&mut self) -> Vec<Score> {
        let scores: Vec<Score> = load_collection(self.storage.as_ref(), SCORES_KEY).await;
        self.show(deduplicate(scores), true);
        self.view.clone()
    }

    fn show(&mut self, source: Vec<Score>, by_points: bool) {
        let mut order: Vec<usize> = (0..source.len()).collect();
        if by_points {
            order.sort_by(|&a, &b| source[b].points.cmp(&source[a].points));
        }
        self.view = order.iter().map(|&index| source[index].clone()).collect();
        self.source = source;
        self.order = order;
    }
}

fn deduplicate(scores: Vec<Score>) -> Vec<Score> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Score> = scores
        .into_iter()
        .rev()
        .filter(|score| seen.insert((score.name.clone(), score.points, score.total)))
        .collect();
    unique.reverse();
    unique
}

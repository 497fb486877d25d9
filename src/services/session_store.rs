use polars::prelude::*;
use tracing::debug;

use crate::error::AppError;

/// The single table a session works on.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Zero rows or zero columns both count as empty.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0 || self.frame.width() == 0
    }

    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }
}

impl From<DataFrame> for Dataset {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

/// Session-scoped holder of exactly one [`Dataset`].
#[derive(Debug, Default)]
pub struct SessionStore {
    dataset: Dataset,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &Dataset {
        &self.dataset
    }

    pub fn replace(&mut self, dataset: Dataset) {
        debug!(rows = dataset.height(), cols = dataset.width(), "Replacing session dataset");
        self.dataset = dataset;
    }

    pub fn clear(&mut self) {
        self.replace(Dataset::empty());
    }

    /// Applies `transform` to the current dataset and stores the result. On
    /// error the stored dataset is left as it was.
    pub fn mutate<F>(&mut self, transform: F) -> Result<&Dataset, AppError>
    where
        F: FnOnce(&DataFrame) -> Result<DataFrame, AppError>,
    {
        let next = transform(self.dataset.frame())?;
        debug!(
            before = self.dataset.height(),
            after = next.height(),
            "Mutated session dataset"
        );
        self.dataset = Dataset::new(next);
        Ok(&self.dataset)
    }
}

//! Figures: ordered, identified renderables realized into caller-supplied
//! slots.

use crate::error::{PlotError, Result};
use crate::subplot::{Rendered, Subplot};
use crate::surface::Surface;
use log::info;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that can draw itself onto a surface.
pub trait Renderable<S: Surface> {
    fn render(&self, surface: S) -> Result<Rendered<S>>;
}

impl<S: Surface> Renderable<S> for Subplot {
    fn render(&self, surface: S) -> Result<Rendered<S>> {
        Subplot::render(self, surface)
    }
}

/// Key of a rendered subplot in the map returned by [`Figure::render`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Name(String),
    /// Insertion position, used when no name is given.
    Position(usize),
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier::Name(name.to_string())
    }
}

impl From<usize> for Identifier {
    fn from(position: usize) -> Self {
        Identifier::Position(position)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Name(name) => f.write_str(name),
            Identifier::Position(position) => write!(f, "{}", position),
        }
    }
}

pub struct Figure<S: Surface> {
    items: Vec<(Box<dyn Renderable<S>>, Identifier)>,
}

impl<S: Surface> Default for Figure<S> {
    fn default() -> Self {
        Figure { items: Vec::new() }
    }
}

impl<S: Surface> fmt::Debug for Figure<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

impl<S: Surface> Figure<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a renderable. Without an identifier it is keyed by its
    /// position. Identifiers must be unique.
    pub fn add_subplot<R>(&mut self, renderable: R, identifier: Option<Identifier>) -> Result<()>
    where
        R: Renderable<S> + 'static,
    {
        let identifier = identifier.unwrap_or(Identifier::Position(self.items.len()));
        if self.items.iter().any(|(_, id)| *id == identifier) {
            return Err(PlotError::config(format!("duplicate subplot identifier '{}'", identifier)));
        }
        self.items.push((Box::new(renderable), identifier));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn identifiers(&self) -> Vec<&Identifier> {
        self.items.iter().map(|(_, id)| id).collect()
    }

    /// Render subplot `i` into `slots[i]`, keeping insertion order.
    pub fn render_ordered(&self, slots: Vec<S>) -> Result<Vec<(Identifier, Rendered<S>)>> {
        if slots.len() != self.items.len() {
            return Err(PlotError::config(format!(
                "{} slots supplied for {} subplots",
                slots.len(),
                self.items.len()
            )));
        }

        self.items
            .iter()
            .zip(slots)
            .map(|((renderable, id), slot)| Ok((id.clone(), renderable.render(slot)?)))
            .collect()
    }

    /// Render every subplot into its slot and key the results by
    /// identifier.
    pub fn render(&self, slots: Vec<S>) -> Result<HashMap<Identifier, Rendered<S>>> {
        Ok(self.render_ordered(slots)?.into_iter().collect())
    }

    /// Create `directory` and return a saver for `<filename><postfix>.png`
    /// inside it.
    pub fn save(&self, directory: impl AsRef<Path>, filename: &str) -> Result<PngSaver> {
        PngSaver::new(directory, filename)
    }
}

/// Writes encoded PNG bytes under a fixed directory and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngSaver {
    directory: PathBuf,
    filename: String,
}

impl PngSaver {
    pub fn new(directory: impl AsRef<Path>, filename: &str) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(PngSaver {
            directory,
            filename: filename.to_string(),
        })
    }

    /// Target path for `postfix`. Path separators are stripped from the
    /// file name so the file always lands in the directory.
    pub fn path(&self, postfix: &str) -> PathBuf {
        let name: String = format!("{}{}.png", self.filename, postfix)
            .chars()
            .filter(|c| *c != '/' && *c != '\\')
            .collect();
        self.directory.join(name)
    }

    pub fn write(&self, png: &[u8], postfix: &str) -> Result<PathBuf> {
        let path = self.path(postfix);
        fs::write(&path, png)?;
        info!("wrote {}", path.display());
        Ok(path)
    }
}

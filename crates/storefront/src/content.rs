//! E-book chapters loaded from markdown.
//!
//! Chapters live in one directory as `*.md` files with YAML frontmatter:
//!
//! ```markdown
//! ---
//! title: ChatGPT for Business Writing
//! lesson: 3
//! summary: Drafting proposals and emails that convert.
//! ---
//!
//! Chapter body...
//! ```
//!
//! Everything is rendered once at startup and held in memory. Chapter HTML is
//! only handed to templates after the access gate has granted access.

use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Chapter frontmatter.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterMeta {
    pub title: String,
    /// Position in the guide, starting at 1.
    pub lesson: u32,
    #[serde(default)]
    pub summary: Option<String>,
}

/// A rendered chapter.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub slug: String,
    pub meta: ChapterMeta,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

/// All chapters of the gated e-book, ordered by lesson number.
#[derive(Debug, Clone, Default)]
pub struct EbookStore {
    chapters: Arc<Vec<Chapter>>,
}

impl EbookStore {
    /// Load every chapter in `dir`.
    ///
    /// A missing directory yields an empty store. Files that fail to parse
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let mut chapters = Vec::new();

        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "E-book content directory does not exist");
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match load_chapter(&path) {
                    Ok(chapter) => {
                        tracing::debug!(slug = %chapter.slug, "Loaded chapter");
                        chapters.push(chapter);
                    }
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "Failed to load chapter");
                    }
                }
            }
        }

        chapters.sort_by(|a, b| {
            a.meta
                .lesson
                .cmp(&b.meta.lesson)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        tracing::info!(count = chapters.len(), "E-book chapters loaded");

        Ok(Self {
            chapters: Arc::new(chapters),
        })
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Total estimated reading time.
    #[must_use]
    pub fn reading_time_minutes(&self) -> u32 {
        self.chapters.iter().map(|c| c.reading_time_minutes).sum()
    }
}

fn load_chapter(path: &Path) -> Result<Chapter, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

    // "03-chatgpt-for-business.md" -> "chatgpt-for-business"
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?;
    let slug = stem
        .split_once('-')
        .filter(|(prefix, rest)| !rest.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()))
        .map_or(stem, |(_, rest)| rest)
        .to_string();

    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<ChapterMeta> = matter
        .parse(&content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    let word_count = parsed.content.split_whitespace().count();
    // Average 200 words per minute.
    let reading_time_minutes = u32::try_from(word_count.div_ceil(200))
        .unwrap_or(u32::MAX)
        .max(1);

    Ok(Chapter {
        slug,
        meta,
        content_html: render_markdown(&parsed.content),
        reading_time_minutes,
    })
}

/// Render GitHub-flavored markdown. Raw HTML is escaped.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

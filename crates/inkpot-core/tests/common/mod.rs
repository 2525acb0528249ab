//! Shared fixtures for integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Builder for article fixture files.
pub struct ArticleFixture {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub draft: bool,
    pub featured: bool,
    pub tags: Vec<String>,
    pub body: String,
}

impl ArticleFixture {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: format!("Title {slug}"),
            date: "2025-06-15T10:00:00Z".to_string(),
            draft: false,
            featured: false,
            tags: Vec::new(),
            body: "Some article body content.".to_string(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn draft(mut self) -> Self {
        self.draft = true;
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn write_to(&self, dir: &Path) {
        let tags = self.tags.join(", ");
        let content = format!(
            "---\ntitle: \"{title}\"\nslug: \"{slug}\"\ndate: {date}\ndraft: {draft}\nfeatured: {featured}\ntags: [{tags}]\n---\n\n{body}\n",
            title = self.title,
            slug = self.slug,
            date = self.date,
            draft = self.draft,
            featured = self.featured,
            body = self.body,
        );
        fs::write(dir.join(format!("{}.md", self.slug)), content).unwrap();
    }
}

/// A temp articles directory that cleans itself up.
pub fn articles_dir() -> TempDir {
    TempDir::new().unwrap()
}

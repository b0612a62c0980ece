//! Synthetic backing data for the demo: a deterministic generator that can
//! produce any prefix of a large collection on demand.

use std::sync::Arc;

use mosaic_foundation::Px;
use mosaic_grid::{
    item::{GridItem, ImageRef, ItemId, PlaceholderToken},
    source::{DataSource, Page, SourceError},
};

struct SampleImage {
    path: &'static str,
    height: i32,
    blur_hash: &'static str,
}

const IMAGES: [SampleImage; 5] = [
    SampleImage {
        path: "assets/canvas-01.png",
        height: 240,
        blur_hash: "L6PZfSjE.AyE_3t7t7R**0o#DgR4",
    },
    SampleImage {
        path: "assets/canvas-02.png",
        height: 300,
        blur_hash: "LGQ0fW~q_3IU%Mt7t7xu~qM{M{xu",
    },
    SampleImage {
        path: "assets/canvas-03.png",
        height: 380,
        blur_hash: "LIQ0fW~q_3IU%Mt7t7xu~qM{M{xu",
    },
    SampleImage {
        path: "assets/canvas-04.png",
        height: 240,
        blur_hash: "L03cJ~D%009F00IU-;WB~q%M-;WB",
    },
    SampleImage {
        path: "assets/canvas-05.png",
        height: 480,
        blur_hash: "LNQ0fW~q_3IU%Mt7t7xu~qM{M{xu",
    },
];

const CATEGORIES: [&str; 8] = [
    "Design",
    "Website",
    "Video",
    "Document",
    "Presentation",
    "Branding",
    "Marketing",
    "Development",
];

const TITLES: [&str; 20] = [
    "Pitch Deck",
    "Website Migration",
    "Fitness Journey",
    "Business Pitch",
    "Music Performance",
    "Workflow Design",
    "Action Shot",
    "Business Opportunity",
    "Creative Portfolio",
    "Brand Identity",
    "Product Launch",
    "Design System",
    "Mobile App",
    "E-commerce Platform",
    "Dashboard UI",
    "Marketing Campaign",
    "Social Media Kit",
    "Video Production",
    "Annual Report",
    "Brand Strategy",
];

fn sample_item(index: usize) -> GridItem {
    let image = &IMAGES[index % IMAGES.len()];
    let title = TITLES[index % TITLES.len()];
    let category = CATEGORIES[index % CATEGORIES.len()];

    GridItem {
        id: ItemId(index as u64 + 1),
        title: Arc::from(format!("{title} {}", index / TITLES.len() + 1)),
        category: Arc::from(category),
        image: ImageRef::new(image.path),
        intrinsic_height: Px(image.height),
        placeholder: PlaceholderToken::new(image.blur_hash),
    }
}

/// A data source that fabricates pages up to a fixed collection size.
pub struct SampleSource {
    total: usize,
}

impl SampleSource {
    /// Creates a source holding `total` generatable items.
    pub fn new(total: usize) -> Self {
        Self { total }
    }

    fn chunk(&self, start: usize, count: usize) -> Page {
        let end = (start + count).min(self.total);
        Page {
            items: (start..end).map(sample_item).collect(),
            exhausted: end >= self.total,
        }
    }
}

impl DataSource for SampleSource {
    fn initial_page(&mut self, count: usize) -> Result<Page, SourceError> {
        Ok(self.chunk(0, count))
    }

    fn next_page(&mut self, after_count: usize, count: usize) -> Result<Page, SourceError> {
        Ok(self.chunk(after_count, count))
    }
}

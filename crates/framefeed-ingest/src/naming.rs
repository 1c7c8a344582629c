//! File name classification and ordering.

use std::cmp::Ordering;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "text"];

/// What an archive entry is, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Image,
    Text,
    Other,
}

impl EntryKind {
    pub fn classify(name: &str) -> Self {
        let Some(ext) = extension(name) else {
            return EntryKind::Other;
        };
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::Image
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::Text
        } else {
            EntryKind::Other
        }
    }
}

fn extension(name: &str) -> Option<String> {
    let (_, ext) = base_name(name).rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// Last path component, accepting both separators.
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Base name up to its first dot.
pub fn stem(name: &str) -> &str {
    let base = base_name(name);
    base.split('.').next().unwrap_or(base)
}

/// First run of digits in the stem, if any.
pub fn numeric_key(name: &str) -> Option<u64> {
    let stem = stem(name);
    let start = stem.find(|c: char| c.is_ascii_digit())?;
    let digits: String = stem[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Image ordering: numeric keys ascending, numbered names before
/// unnumbered ones, lexicographic for ties and unnumbered pairs.
pub fn compare_image_names(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(EntryKind::classify("frames/001.JPG"), EntryKind::Image);
        assert_eq!(EntryKind::classify("a.webp"), EntryKind::Image);
        assert_eq!(EntryKind::classify("prompts.txt"), EntryKind::Text);
        assert_eq!(EntryKind::classify("notes.TEXT"), EntryKind::Text);
        assert_eq!(EntryKind::classify("readme.md"), EntryKind::Other);
        assert_eq!(EntryKind::classify("Makefile"), EntryKind::Other);
        assert_eq!(EntryKind::classify("dir.png/file"), EntryKind::Other);
    }

    #[test]
    fn test_numeric_key() {
        assert_eq!(numeric_key("frames/frame_012.jpg"), Some(12));
        assert_eq!(numeric_key("shot3_take9.png"), Some(3));
        assert_eq!(numeric_key("dir\\img7.png"), Some(7));
        assert_eq!(numeric_key("cover.v2.png"), None);
        assert_eq!(numeric_key("3d/cover.png"), None);
    }

    #[test]
    fn test_numeric_order_not_lexicographic() {
        let mut names = vec!["img10.jpg", "img2.jpg", "img1.jpg"];
        names.sort_by(|a, b| compare_image_names(a, b));
        assert_eq!(names, vec!["img1.jpg", "img2.jpg", "img10.jpg"]);
    }

    #[test]
    fn test_numbered_before_unnumbered() {
        let mut names = vec!["cover.png", "b.png", "frame_5.png", "frame_05.jpg"];
        names.sort_by(|a, b| compare_image_names(a, b));
        assert_eq!(names, vec!["frame_05.jpg", "frame_5.png", "b.png", "cover.png"]);
    }
}

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

pub const STEM_PREFIX: &str = "Screenshot_";
pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";

/// `<root>/images` + `<root>/labels`, the on-disk dataset layout.
#[derive(Clone, Debug)]
pub struct DatasetDirs {
    root: PathBuf,
}

impl DatasetDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn labels(&self) -> PathBuf {
        self.root.join(LABELS_DIR)
    }

    pub fn image_path(&self, stem: &str) -> PathBuf {
        self.images().join(format!("{stem}.png"))
    }

    pub fn label_path(&self, stem: &str) -> PathBuf {
        self.labels().join(format!("{stem}.txt"))
    }

    pub fn create(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.images())?;
        std::fs::create_dir_all(self.labels())
    }
}

/// Hands out unique `Screenshot_<yyyyMMdd_HHmmss>` stems.
///
/// The timestamp has one-second resolution; a second stem within the same
/// second, or one whose files already exist, gets a `_<n>` counter suffix.
#[derive(Debug, Default)]
pub struct StemAllocator {
    last_stamp: String,
    counter: u32,
}

impl StemAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, now: NaiveDateTime, dirs: &DatasetDirs) -> String {
        let stamp = now.format("%Y%m%d_%H%M%S").to_string();
        if stamp != self.last_stamp {
            self.last_stamp = stamp;
            self.counter = 0;
        } else {
            self.counter += 1;
        }

        loop {
            let stem = if self.counter == 0 {
                format!("{STEM_PREFIX}{}", self.last_stamp)
            } else {
                format!("{STEM_PREFIX}{}_{}", self.last_stamp, self.counter)
            };
            if !dirs.image_path(&stem).exists() && !dirs.label_path(&stem).exists() {
                return stem;
            }
            self.counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn stems_follow_timestamp_format() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = DatasetDirs::new(dir.path());
        let mut stems = StemAllocator::new();
        assert_eq!(stems.next(at(9, 5, 1), &dirs), "Screenshot_20240307_090501");
        assert_eq!(stems.next(at(9, 5, 3), &dirs), "Screenshot_20240307_090503");
    }

    #[test]
    fn same_second_gets_counter() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = DatasetDirs::new(dir.path());
        let mut stems = StemAllocator::new();
        assert_eq!(stems.next(at(12, 0, 0), &dirs), "Screenshot_20240307_120000");
        assert_eq!(stems.next(at(12, 0, 0), &dirs), "Screenshot_20240307_120000_1");
        assert_eq!(stems.next(at(12, 0, 0), &dirs), "Screenshot_20240307_120000_2");
        assert_eq!(stems.next(at(12, 0, 1), &dirs), "Screenshot_20240307_120001");
    }

    #[test]
    fn existing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = DatasetDirs::new(dir.path());
        dirs.create().unwrap();
        std::fs::write(dirs.label_path("Screenshot_20240307_120000"), "").unwrap();
        std::fs::write(dirs.image_path("Screenshot_20240307_120000_1"), "").unwrap();

        let mut stems = StemAllocator::new();
        assert_eq!(stems.next(at(12, 0, 0), &dirs), "Screenshot_20240307_120000_2");
        assert_eq!(stems.next(at(12, 0, 0), &dirs), "Screenshot_20240307_120000_3");
    }

    #[test]
    fn paths_share_stem() {
        let dirs = DatasetDirs::new("out");
        assert_eq!(dirs.image_path("s"), Path::new("out/images/s.png"));
        assert_eq!(dirs.label_path("s"), Path::new("out/labels/s.txt"));
    }
}

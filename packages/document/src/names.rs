use crate::{Document, StyleFamily};
use crc32fast::Hasher;

/// Generate a member seed from a member id using CRC32
///
/// Names generated by different members carry different seeds, so two members
/// inserting objects at the same time do not pick the same name.
pub fn member_seed(member_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(member_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential generator for object names (automatic styles, frames, images)
#[derive(Debug, Clone)]
pub struct ObjectNameGenerator {
    seed: String,
    count: u32,
}

impl ObjectNameGenerator {
    pub fn new(member_id: &str) -> Self {
        Self {
            seed: member_seed(member_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    fn next_candidate(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}{}_{}", prefix, self.seed, self.count)
    }

    /// Next automatic style name unused by any graphic style in `doc`
    pub fn generate_style_name(&mut self, doc: &Document) -> String {
        loop {
            let name = self.next_candidate("auto");
            if doc.style(&name, StyleFamily::Graphic).is_none() {
                return name;
            }
        }
    }

    /// Next frame name unused in `doc`
    pub fn generate_frame_name(&mut self, doc: &Document) -> String {
        let taken = doc.frame_names();
        loop {
            let name = self.next_candidate("fr");
            if !taken.contains(&name) {
                return name;
            }
        }
    }

    /// Next image base name (without directory or extension) unused in `doc`
    pub fn generate_image_name(&mut self, doc: &Document) -> String {
        loop {
            let name = self.next_candidate("img");
            let in_use = doc.blob_names().any(|blob| {
                let file = blob.rsplit('/').next().unwrap_or(blob);
                file.split('.').next() == Some(name.as_str())
            });
            if !in_use {
                return name;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blob, StyleDef};

    #[test]
    fn test_member_seed_is_stable() {
        assert_eq!(member_seed("alice"), member_seed("alice"));
        assert_ne!(member_seed("alice"), member_seed("bob"));
    }

    #[test]
    fn test_sequential_names() {
        let doc = Document::new();
        let mut gen = ObjectNameGenerator::from_seed("s".to_string());

        assert_eq!(gen.generate_style_name(&doc), "autos_1");
        assert_eq!(gen.generate_frame_name(&doc), "frs_2");
        assert_eq!(gen.generate_image_name(&doc), "imgs_3");
    }

    #[test]
    fn test_skips_names_already_in_document() {
        let mut doc = Document::new();
        doc.add_style(StyleDef::new("autos_1", StyleFamily::Graphic), true);
        doc.set_blob(
            "Pictures/imgs_2.png",
            Blob {
                mimetype: "image/png".to_string(),
                content: "AA==".to_string(),
            },
        );

        let mut gen = ObjectNameGenerator::from_seed("s".to_string());
        assert_eq!(gen.generate_style_name(&doc), "autos_2");

        let mut gen = ObjectNameGenerator::from_seed("s".to_string());
        gen.count = 1;
        assert_eq!(gen.generate_image_name(&doc), "imgs_3");
    }
}

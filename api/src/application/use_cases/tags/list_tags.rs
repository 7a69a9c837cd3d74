use crate::application::ports::tag_repository::TagRepository;
use crate::application::use_cases::tags::TagError;
use crate::domain::tags::tag::{Tag, TagType};

pub struct ListTags<'a, R: TagRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TagRepository + ?Sized> ListTags<'a, R> {
    pub async fn execute(&self, tag_type: Option<&str>) -> Result<Vec<Tag>, TagError> {
        let tag_type: Option<TagType> = match tag_type.map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse()?),
        };
        Ok(self.repo.list_tags(tag_type).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;

    #[tokio::test]
    async fn filters_by_type() {
        let store = InMemoryStore::new();
        store.seed_tag("Shelf", TagType::SimLocation);
        store.seed_tag("Spare", TagType::Spare);
        let uc = ListTags { repo: &store };

        assert_eq!(uc.execute(None).await.unwrap().len(), 2);
        let spare = uc.execute(Some("spare")).await.unwrap();
        assert_eq!(spare.len(), 1);
        assert_eq!(spare[0].name, "Spare");
        assert!(matches!(uc.execute(Some("bin")).await, Err(TagError::BadRequest(_))));
    }
}

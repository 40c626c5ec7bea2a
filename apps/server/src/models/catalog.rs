//! Collections served by the API and how each one is searched and stored.

use wws_query::{Combinator, SearchSpec, ShapeAdapter};

use crate::config::{CollectionConfig, CollectionsConfig};

/// Catalog entities exposed under `/api/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogEntity {
    Course,
    Scholarship,
    University,
    Event,
}

impl CatalogEntity {
    pub const ALL: [CatalogEntity; 4] = [
        CatalogEntity::Course,
        CatalogEntity::Scholarship,
        CatalogEntity::University,
        CatalogEntity::Event,
    ];

    /// Name used in response messages ("Course added successfully").
    pub fn label(self) -> &'static str {
        match self {
            CatalogEntity::Course => "Course",
            CatalogEntity::Scholarship => "Scholarship",
            CatalogEntity::University => "University",
            CatalogEntity::Event => "Event",
        }
    }

    /// Path segment of the single-record routes (`/api/course/:id`).
    pub fn singular(self) -> &'static str {
        match self {
            CatalogEntity::Course => "course",
            CatalogEntity::Scholarship => "scholarship",
            CatalogEntity::University => "university",
            CatalogEntity::Event => "event",
        }
    }

    /// Path segment of the list and search routes (`/api/search/events`).
    pub fn plural(self) -> &'static str {
        match self {
            CatalogEntity::Course => "course",
            CatalogEntity::Scholarship => "scholarships",
            CatalogEntity::University => "universities",
            CatalogEntity::Event => "events",
        }
    }

    /// Extra key carrying the new id in create responses, next to `id`.
    ///
    /// Existing frontend clients read these names; scholarships and
    /// universities have always answered with `userId`.
    pub fn created_id_key(self) -> &'static str {
        match self {
            CatalogEntity::Course => "courseId",
            CatalogEntity::Event => "eventId",
            CatalogEntity::Scholarship | CatalogEntity::University => "userId",
        }
    }

    /// Searchable fields and how they combine.
    ///
    /// Events match when any supplied field matches; the other entities need
    /// every supplied field to match.
    pub fn search_spec(self) -> wws_query::Result<SearchSpec> {
        match self {
            CatalogEntity::Course => SearchSpec::new(Combinator::And)
                .contains("subject")?
                .contains("studyLevel")?
                .contains("destination"),
            CatalogEntity::Scholarship => SearchSpec::new(Combinator::And)
                .contains("studyLevel")?
                .contains("destination"),
            CatalogEntity::University => SearchSpec::new(Combinator::And)
                .contains("universityName")?
                .contains("destination"),
            CatalogEntity::Event => SearchSpec::new(Combinator::Or)
                .contains("city")?
                .contains("month")?
                .contains("destination"),
        }
    }
}

/// A physical collection and the adapter for its storage shape.
#[derive(Debug, Clone)]
pub struct CollectionHandle {
    pub name: String,
    pub adapter: ShapeAdapter,
}

impl CollectionHandle {
    fn from_config(config: &CollectionConfig) -> wws_query::Result<Self> {
        Ok(Self {
            name: config.name.clone(),
            adapter: ShapeAdapter::new(config.shape()?),
        })
    }
}

/// A catalog collection together with its search fields.
#[derive(Debug, Clone)]
pub struct CatalogCollection {
    pub entity: CatalogEntity,
    pub handle: CollectionHandle,
    pub search: SearchSpec,
}

/// Every collection the server touches, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: CatalogCollection,
    scholarships: CatalogCollection,
    universities: CatalogCollection,
    events: CatalogCollection,
    pub users: CollectionHandle,
    pub help: CollectionHandle,
    pub collaborate: CollectionHandle,
    /// Lookup of users by role.
    pub user_roles: SearchSpec,
    /// Lookup of enquiries by submitter.
    pub help_by_email: SearchSpec,
}

impl Catalog {
    pub fn from_config(config: &CollectionsConfig) -> wws_query::Result<Self> {
        let catalog = |entity: CatalogEntity, config: &CollectionConfig| {
            Ok::<_, wws_query::Error>(CatalogCollection {
                entity,
                handle: CollectionHandle::from_config(config)?,
                search: entity.search_spec()?,
            })
        };

        Ok(Self {
            courses: catalog(CatalogEntity::Course, &config.courses)?,
            scholarships: catalog(CatalogEntity::Scholarship, &config.scholarships)?,
            universities: catalog(CatalogEntity::University, &config.universities)?,
            events: catalog(CatalogEntity::Event, &config.events)?,
            users: CollectionHandle::from_config(&config.users)?,
            help: CollectionHandle::from_config(&config.help)?,
            collaborate: CollectionHandle::from_config(&config.collaborate)?,
            user_roles: SearchSpec::new(Combinator::And).exact("role")?,
            help_by_email: SearchSpec::new(Combinator::And).exact("userEmail")?,
        })
    }

    pub fn entity(&self, entity: CatalogEntity) -> &CatalogCollection {
        match entity {
            CatalogEntity::Course => &self.courses,
            CatalogEntity::Scholarship => &self.scholarships,
            CatalogEntity::University => &self.universities,
            CatalogEntity::Event => &self.events,
        }
    }
}

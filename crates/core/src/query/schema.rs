//! Queryable fields of each collection.
//!
//! Each field has a wire name (camelCase, as clients see it), the storage
//! column it lives in and a kind that drives value parsing and comparison.
//! Dotted wire names address nested objects in the JSON representation.

/// Type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A record identifier or reference to one.
    Id,
    Int,
    Float,
    Text,
    Bool,
    Timestamp,
    /// An array of text values; matches when any element matches.
    TextList,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, column: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, column, kind }
}

/// Name of the identifier field every record carries.
pub const ID_FIELD: &str = "id";

/// Name of the creation timestamp used for the default sort order.
pub const CREATED_AT_FIELD: &str = "createdAt";

#[derive(Debug)]
pub struct CollectionSchema {
    /// Singular entity name used in error messages.
    pub entity: &'static str,
    /// Storage table.
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

impl CollectionSchema {
    /// Look up a field by wire name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The identifier field.
    pub fn id_field(&self) -> &'static FieldDef {
        self.field(ID_FIELD)
            .expect("every collection schema declares an id field")
    }
}

/// The collections exposed through list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Bootcamps,
    Courses,
    Reviews,
    Users,
}

impl Collection {
    pub fn schema(self) -> &'static CollectionSchema {
        match self {
            Collection::Bootcamps => &BOOTCAMPS,
            Collection::Courses => &COURSES,
            Collection::Reviews => &REVIEWS,
            Collection::Users => &USERS,
        }
    }

    pub fn entity(self) -> &'static str {
        self.schema().entity
    }
}

use FieldKind::{Bool, Float, Id, Int, Text, TextList, Timestamp};

static BOOTCAMPS: CollectionSchema = CollectionSchema {
    entity: "Bootcamp",
    table: "bootcamps",
    fields: &[
        field("id", "id", Id),
        field("name", "name", Text),
        field("slug", "slug", Text),
        field("description", "description", Text),
        field("website", "website", Text),
        field("phone", "phone", Text),
        field("email", "email", Text),
        field("address", "address", Text),
        field("location.formattedAddress", "formatted_address", Text),
        field("location.street", "street", Text),
        field("location.city", "city", Text),
        field("location.state", "state", Text),
        field("location.zipcode", "zipcode", Text),
        field("location.country", "country", Text),
        field("careers", "careers", TextList),
        field("averageRating", "average_rating", Float),
        field("averageCost", "average_cost", Float),
        field("photo", "photo", Text),
        field("housing", "housing", Bool),
        field("jobAssistance", "job_assistance", Bool),
        field("jobGuarantee", "job_guarantee", Bool),
        field("acceptGi", "accept_gi", Bool),
        field("user", "user_id", Id),
        field("createdAt", "created_at", Timestamp),
    ],
};

static COURSES: CollectionSchema = CollectionSchema {
    entity: "Course",
    table: "courses",
    fields: &[
        field("id", "id", Id),
        field("title", "title", Text),
        field("description", "description", Text),
        field("weeks", "weeks", Text),
        field("tuition", "tuition", Float),
        field("minimumSkill", "minimum_skill", Text),
        field("scholarshipAvailable", "scholarship_available", Bool),
        field("bootcamp", "bootcamp_id", Id),
        field("user", "user_id", Id),
        field("createdAt", "created_at", Timestamp),
    ],
};

static REVIEWS: CollectionSchema = CollectionSchema {
    entity: "Review",
    table: "reviews",
    fields: &[
        field("id", "id", Id),
        field("title", "title", Text),
        field("text", "text", Text),
        field("rating", "rating", Int),
        field("bootcamp", "bootcamp_id", Id),
        field("user", "user_id", Id),
        field("createdAt", "created_at", Timestamp),
    ],
};

// Credentials and reset-token columns are deliberately absent: they can be
// neither filtered on nor sorted by.
static USERS: CollectionSchema = CollectionSchema {
    entity: "User",
    table: "users",
    fields: &[
        field("id", "id", Id),
        field("name", "name", Text),
        field("email", "email", Text),
        field("role", "role", Text),
        field("createdAt", "created_at", Timestamp),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_collection_has_id_and_created_at() {
        for c in [
            Collection::Bootcamps,
            Collection::Courses,
            Collection::Reviews,
            Collection::Users,
        ] {
            assert_eq!(c.schema().id_field().kind, FieldKind::Id);
            assert!(c.schema().field(CREATED_AT_FIELD).is_some(), "{c:?}");
        }
    }

    #[test]
    fn wire_names_map_to_columns() {
        let f = Collection::Bootcamps.schema().field("averageCost").unwrap();
        assert_eq!(f.column, "average_cost");
        assert_eq!(f.kind, FieldKind::Float);

        let f = Collection::Bootcamps.schema().field("location.city").unwrap();
        assert_eq!(f.column, "city");
    }

    #[test]
    fn users_do_not_expose_password_columns() {
        let schema = Collection::Users.schema();
        assert!(schema.field("password").is_none());
        assert!(schema.field("passwordHash").is_none());
    }
}

//! Static filter vocabularies
//!
//! Option lists that do not depend on the dataset. They are merged into
//! every project bucket of the filter vocabulary.

/// The only accepted value of the digitalization filter.
pub const DIGITALIZATION_SENTINEL: &str = "cerca solo Item con scansioni online";

/// Filter value asserting that the attribute is empty.
pub const EMPTY_SENTINEL: &str = "__EMPTY__";

/// Bucket holding the union of every project.
pub const ALL_PROJECTS: &str = "__ALL__";

pub const UNKNOWN_PROJECT: &str = "Unknown Project";

pub const PHYSICAL_OBJECT_CREATOR: &str = "Creatore dell’unità materiale";
pub const PHYSICAL_OBJECT_OWNER: &str = "Possessore dell’unità materiale";

pub const EXPRESSION_ROLES: &[&str] = &[
    "Traduttore",
    "Curatore",
    "Sceneggiatore",
    "Compositore",
    "Recensore",
    "Altro ruolo secondario",
];

pub const MANIFESTATION_ROLES: &[&str] = &["Editore", "Curatore", "Correttore", "Finanziatore"];

pub const VISUAL_OBJECT_ROLES: &[&str] = &[
    "Possessore precedente",
    "Annotatore",
    "Dedicatore",
    "Dedicatario",
];

pub const PHYSICAL_OBJECT_ROLES: &[&str] = &[
    "Possessore dell’unità materiale",
    "Creatore dell’unità materiale",
];

/// Role buckets the indexer can write on a person.
pub const PERSON_ROLES: &[&str] = &[
    "Autore dell’opera",
    "Traduttore",
    "Curatore",
    "Sceneggiatore",
    "Compositore",
    "Recensore",
    "Altro ruolo secondario",
    "Editore",
    "Correttore",
    "Finanziatore",
    "Owner of item",
    "Possessore precedente",
    "Annotatore",
    "Dedicatore",
    "Dedicatario",
    "Creatore dell’unità materiale",
    "Possessore dell’unità materiale",
    "Member of",
];

pub const INSTITUTION_ROLES: &[&str] = &[
    "Autore dell’opera",
    "Traduttore",
    "Curatore",
    "Sceneggiatore",
    "Compositore",
    "Recensore",
    "Altro ruolo secondario",
    "Finanziatore",
    "Correttore",
    "Owner of item",
    "Possessore precedente",
    "Annotatore",
    "Dedicatore",
    "Dedicatario",
    "Creatore dell’unità materiale",
    "Possessore dell’unità materiale",
    "Membro",
];

/// Kinds an abstract character can be mentioned in.
pub const MENTIONED_IN_KINDS: &[&str] = &[
    "work",
    "expression",
    "manifestation",
    "manifestation_volume",
    "item",
    "page",
    "visual_object",
    "person",
    "physical_object",
    "institution",
    "event",
];

/// Static buckets, keyed by filter name.
pub const STATIC_FILTERS: &[(&str, &[&str])] = &[
    ("search_for_roles_in_expression", EXPRESSION_ROLES),
    ("search_for_roles_in_manifestation", MANIFESTATION_ROLES),
    ("visual_object_roles", VISUAL_OBJECT_ROLES),
    ("physical_object_roles", PHYSICAL_OBJECT_ROLES),
    ("person_roles", PERSON_ROLES),
    ("institution_roles", INSTITUTION_ROLES),
    ("abstract_character_mentioned_in", MENTIONED_IN_KINDS),
];

/// Visual-object types that do not make a page count as annotated.
pub const NON_ANNOTATION_TYPES: &[&str] = &[
    "watermark",
    "drawing",
    "decoration",
    "filigrana",
    "disegno",
    "ornamentazione",
];

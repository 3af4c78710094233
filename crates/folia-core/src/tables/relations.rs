//! Relation-name tables used when populating detail caches.

/// Personal relationships: relation name to (outgoing label, incoming label).
pub const PERSONAL_RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("is_parent_of", "Is the parent of", "Is the child of"),
    ("is_the_parent_of", "Is the parent of", "Is the child of"),
    ("is_sibling_of", "Is the sibling of", "Is the sibling of"),
    ("is_the_half_sibling_of", "Is the half-sibling of", "Is the half-sibling of"),
    ("is_the_spouse_of", "Is the spouse of", "Is the spouse of"),
    ("is_the_uncle_of", "Is the uncle of", "Is the nephew/niece of"),
    (
        "is_the_grandfather/grandmother_of",
        "Is the grandfather/grandmother of",
        "Is the grandson/granddaughter of",
    ),
    ("is_the_cousin_of", "Is the cousin of", "Is the cousin of"),
    ("is_parent-in-law_of", "Is the parent-in-law of", "Is the child-in-law of"),
    (
        "is_the_brother-in-law/sister-in-law_of",
        "Is the brother-in-law/sister-in-law of",
        "Is the brother-in-law/sister-in-law of",
    ),
    (
        "is_the_great-uncle/great-aunt_of",
        "Is the great-uncle/great-aunt of",
        "Is the great-nephew/great-niece of",
    ),
    (
        "is_the_great-grandfather/great-grandmother_of",
        "Is the great-grandfather/great-grandmother of",
        "Is the great-grandson/great-granddaughter of",
    ),
    ("is_the_teacher_of", "Is the teacher of", "Is the student/pupil of"),
    ("is_friend_of", "Is a friend of", "Is a friend of"),
    ("is_the_master_of", "Is the master of", "Is the apprentice of"),
    ("is_the_patron_of", "Is the patron of", "Is the client of"),
    ("is_the_employer_of", "Is the employer of", "Is the employee of"),
    ("is_the_godparent_of", "Is the godparent of", "Is the godchild of"),
    ("is_the_ally_of", "Is the ally of", "Is the ally of"),
    ("is_the_rival_of", "Is the rival of", "Is the rival of"),
    ("influenced", "Influenced", "Was influenced by"),
    ("is_in_love_with", "Is in love with", "Is in love with"),
    ("is_the_lover_of", "Is the lover of", "Is the lover of"),
    ("è_genitore_di", "È genitore di", "È figlio/a di"),
    ("è_fratello/sorella_di", "È fratello/sorella di", "È fratello/sorella di"),
    (
        "è_fratellastro/sorellastra_di",
        "È fratellastro/sorellastra di",
        "È fratellastro/sorellastra di",
    ),
    ("è_sposo/a_di", "È sposo/a di", "È sposo/a di"),
    ("è_zio_di", "È zio di", "È nipote di"),
    ("è_nonno/a_di", "È nonno/a di", "È nipote di"),
    ("è_cugino/a_di", "È cugino/a di", "È cugino/a di"),
    ("è_suocero/a_di", "È suocero/a di", "È genero/nuora di"),
    ("è_cognato/a_di", "È cognato/a di", "È cognato/a di"),
    ("è_prozio/a_di", "È prozio/a di", "È pronipote di"),
    ("è_bisnonno/a_di", "È bisnonno/a di", "È pronipote di"),
    ("è_maestro_di", "È maestro di", "È allievo di"),
    ("è_amico/a_di", "È amico/a di", "È amico/a di"),
    ("è_maestro/a_di", "È maestro/a di", "È apprendista di"),
    ("è_patrono/a_di", "È patrono/a di", "È cliente di"),
    ("è_datore_di_lavoro_di", "È datore di lavoro di", "È dipendente di"),
    ("è_padrino/madrina_di", "È padrino/madrina di", "È figlioccio/a di"),
    ("è_alleato/a_di", "È alleato/a di", "È alleato/a di"),
    ("è_rivale_di", "È rivale di", "È rivale di"),
    ("ha_influenzato", "Ha influenzato", "È stato/a influenzato/a da"),
    ("è_innamorato/a_di", "È innamorato/a di", "È innamorato/a di"),
    ("è_l'amante_di", "È l'amante di", "È l'amante di"),
];

/// Relations whose object is a literal value rather than an entity.
pub const ATTRIBUTE_RELATIONS: &[&str] = &[
    "item_has_shelf_mark",
    "item_has_preservation_status",
    "item_has_material",
    "item_has_type",
    "item_has_dimensions",
    "item_has_copy_number",
    "item_has_surviving_pages",
    "item_has_physical_description",
    "manifestation_has_external_id",
    "manifestation_has_print_run",
    "manifestation_has_edition_number",
    "manifestation_has_number_of_volumes",
    "manifestation_has_format",
    "manifestation_has_collation_formula",
    "manifestation_has_number_of_pages",
    "manifestation_has_introduction_pages",
    "manifestation_has_external_digitization",
    "manifestation_has_pages",
    "expression_has_incipit",
    "expression_has_explicit",
    "expression_has_completeness",
];

/// Structural links handled by dedicated page/item passes instead of the
/// generic edge writer.
pub const SKIPPED_STRUCTURAL_RELATIONS: &[&str] = &[
    "item_has_page",
    "page_from_manifestation",
    "page_from_manifestation_volume",
];

/// Parent/child relations: subject is the child unless listed in
/// [`CONTAINER_FIRST_RELATIONS`].
pub const PARENT_CHILD_RELATIONS: &[&str] = &[
    "is_expression_of_work",
    "is_manifestation_of_expression",
    "is_item_of_manifestation",
    "manifestation_has_volume",
    "item_has_manifestation_volume",
    "item_contains_physical_object",
];

/// Parent/child relations whose subject is the container.
pub const CONTAINER_FIRST_RELATIONS: &[&str] =
    &["manifestation_has_volume", "item_contains_physical_object"];

/// English role shown on a person or institution page for each role relation.
pub const ROLE_RELATIONS: &[(&str, &str)] = &[
    ("work_authored_by", "Author"),
    ("expression_has_translator", "Translator"),
    ("expression_has_editor", "Editor"),
    ("expression_has_scriptwriter", "Scriptwriter"),
    ("expression_has_compositor", "Compositor"),
    ("expression_has_reviewer", "Reviewer"),
    ("expression_has_other_secondary_role", "Other secondary role"),
    ("manifestation_published_by", "Publisher"),
    ("manifestation_volume_published_by", "Publisher"),
    ("manifestation_edited_by", "Editor"),
    ("manifestation_volume_edited_by", "Editor"),
    ("manifestation_sponsored_by", "Sponsor"),
    ("manifestation_volume_sponsored_by", "Sponsor"),
    ("manifestation_corrected_by", "Corrector"),
    ("manifestation_volume_corrected_by", "Corrector"),
    ("item_owned_by", "Owner of item"),
    ("visual_object_owned_by", "Owner"),
    ("visual_object_owned_by_person", "Owner"),
    ("visual_object_inscribed_by", "Inscriber"),
    ("visual_object_inscribed_by_person", "Inscriber"),
    ("visual_object_sent_by", "Sender"),
    ("visual_object_sent_by_person", "Sender"),
    ("visual_object_received_by", "Recipient"),
    ("visual_object_received_by_person", "Recipient"),
    ("physical_object_created_by", "Creator of PO"),
    ("physical_object_owned_by", "Owner of PO"),
    ("person_member_of_institution", "Member"),
];

/// Reverse role written on the member's own page.
pub const MEMBER_OF_ROLE: &str = "Member of";

/// Visual-object relation to the group it is listed under on the object's page.
pub const VISUAL_OBJECT_GROUPS: &[(&str, &str)] = &[
    ("page_contains_visual_object", "Contained in Page"),
    ("visual_object_owned_by", "Owner"),
    ("visual_object_owned_by_person", "Owner"),
    ("visual_object_owned_by_institution", "Owner"),
    ("visual_object_inscribed_by", "Inscriber"),
    ("visual_object_inscribed_by_person", "Inscriber"),
    ("visual_object_sent_by", "Sender"),
    ("visual_object_sent_by_person", "Sender"),
    ("visual_object_received_by", "Recipient"),
    ("visual_object_received_by_person", "Recipient"),
];

fn lookup<'a>(table: &'a [(&'a str, &'a str)], name: &str) -> Option<&'a str> {
    table.iter().find(|(key, _)| *key == name).map(|(_, v)| *v)
}

pub fn personal_labels(name: &str) -> Option<(&'static str, &'static str)> {
    PERSONAL_RELATIONSHIPS
        .iter()
        .find(|(key, _, _)| *key == name)
        .map(|(_, out, inc)| (*out, *inc))
}

pub fn role_for_relation(name: &str) -> Option<&'static str> {
    lookup(ROLE_RELATIONS, name)
}

pub fn visual_object_group(name: &str) -> Option<&'static str> {
    lookup(VISUAL_OBJECT_GROUPS, name)
}

pub fn is_attribute_relation(name: &str) -> bool {
    ATTRIBUTE_RELATIONS.contains(&name)
}

pub fn is_skipped_structural(name: &str) -> bool {
    SKIPPED_STRUCTURAL_RELATIONS.contains(&name)
}

pub fn is_parent_child(name: &str) -> bool {
    PARENT_CHILD_RELATIONS.contains(&name)
}

pub fn is_container_first(name: &str) -> bool {
    CONTAINER_FIRST_RELATIONS.contains(&name)
}

/// Mention edges are grouped apart from other generic associations.
pub fn is_mention(name: &str) -> bool {
    name.contains("is_mentioning") || name.contains("is_mentioned_by")
}

//! Label translation tables
//!
//! Raw vocabulary labels (mostly English, sometimes already Italian) are
//! standardized to their Italian display form. Keys are lower-case.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::languages::LANGUAGES;

pub const PHYSICAL_OBJECT_TYPES: &[(&str, &str)] = &[
    ("binding", "Legatura"),
    ("legatura", "Legatura"),
    ("label", "Etichetta"),
    ("etichetta", "Etichetta"),
    ("picture", "Fotografia"),
    ("fotografia", "Fotografia"),
    ("sacred image", "Immagine sacra"),
    ("immagine sacra", "Immagine sacra"),
    ("calling card", "Biglietto da visita"),
    ("biglietto da visita", "Biglietto da visita"),
    ("bookmark", "Segnalibro"),
    ("segnalibro", "Segnalibro"),
    ("botanical specimen", "Specimen botanico"),
    ("specimen botanico", "Specimen botanico"),
    ("ticket", "Biglietto"),
    ("biglietto", "Biglietto"),
    ("postcard", "Cartolina"),
    ("cartolina", "Cartolina"),
    ("letter", "Lettera"),
    ("lettera", "Lettera"),
    ("loose page", "Foglio sciolto"),
    ("foglio sciolto", "Foglio sciolto"),
    ("newspaper cutting", "Ritaglio di giornale"),
    ("ritaglio di giornale", "Ritaglio di giornale"),
    ("box", "Scatola"),
    ("scatola", "Scatola"),
    ("envelop", "Busta"),
    ("envelope", "Busta"),
    ("busta", "Busta"),
    ("cartographic material", "Materiale cartografico"),
    ("materiale cartografico", "Materiale cartografico"),
    ("musical score", "Spartito musicale"),
    ("spartito musicale", "Spartito musicale"),
    ("graphic material", "Materiale grafico"),
    ("materiale grafico", "Materiale grafico"),
    ("painting", "Dipinto"),
    ("dipinto", "Dipinto"),
    ("sculpture", "Scultura"),
    ("scultura", "Scultura"),
    ("medal", "Medaglia"),
    ("medaglia", "Medaglia"),
    ("coin", "Moneta"),
    ("moneta", "Moneta"),
    ("scientific instrument", "Strumento scientifico"),
    ("strumento scientifico", "Strumento scientifico"),
    ("armor", "Armatura"),
    ("armatura", "Armatura"),
    ("weapon", "Arma"),
    ("arma", "Arma"),
    ("mask", "Maschera"),
    ("maschera", "Maschera"),
    ("garment", "Indumento"),
    ("indumento", "Indumento"),
];

pub const ITEM_PRESERVATION: &[(&str, &str)] = &[
    ("n (fantasma)", "Non conservato/non identificato"),
    ("y (esiste)", "Conservato"),
];

pub const ITEM_MATERIALS: &[(&str, &str)] = &[("p", "Carta"), ("v", "Pergamena")];

pub const ITEM_TYPES: &[(&str, &str)] = &[
    ("manuscript", "Manoscritto"),
    ("printed", "Libro a stampa"),
];

pub const EXPRESSION_TYPES: &[(&str, &str)] = &[
    ("original text", "Testo originario"),
    ("testo originario", "Testo originario"),
    ("translation", "Traduzione"),
    ("traduzione", "Traduzione"),
    ("critical edition", "Edizione critica"),
    ("edizione critica", "Edizione critica"),
    ("paratext", "Paratesto"),
    ("paratesto", "Paratesto"),
    ("database", "Banca dati online"),
    ("banca dati online", "Banca dati online"),
    ("review", "Recensione"),
    ("recensione", "Recensione"),
    ("summary", "Sintesi"),
    ("sintesi", "Sintesi"),
    ("collation", "Collazione"),
    ("collazione", "Collazione"),
    ("excerpt", "Estratto"),
    ("estratto", "Estratto"),
];

pub const INSERTION_TYPES: &[(&str, &str)] = &[
    ("loose", "sciolto"),
    ("bound", "rilegato"),
    ("glued", "incollato"),
    ("taped", "applicato con il nastro adesivo"),
    ("sewed on", "cucito"),
    ("pinned", "appuntato o spillato"),
];

pub const VISUAL_OBJECT_TYPES: &[(&str, &str)] = &[
    ("verbal annotation", "Annotazione verbale"),
    ("non verbal mark", "Segno non verbale"),
    ("decoration", "Ornamentazione"),
    ("drawing", "Disegno"),
    ("modification of the page", "Alterazione della pagina"),
    ("picture", "Fotografia"),
    ("printed or manuscript text", "Testo"),
    ("watermark", "Filigrana"),
];

pub const VISUAL_OBJECT_INSTRUMENTS: &[(&str, &str)] = &[
    ("pencil", "matita"),
    ("coloured pencil", "matita colorata"),
    ("pen", "penna"),
    ("ballpoint pen", "penna a sfera"),
    ("stamp", "timbro"),
    ("tool", "ferro o altro strumento"),
    ("printed", "stampa"),
];

pub const VISUAL_OBJECT_COLOURS: &[(&str, &str)] = &[
    ("gold", "Oro"),
    ("black", "Nero"),
    ("light brown", "Bruno chiaro"),
    ("red", "Rosso"),
    ("dark brown", "Bruno"),
    ("blue", "Blu"),
    ("grey", "Grigio"),
    ("gray", "Grigio"),
    ("blind", "A secco"),
    ("yellow", "Giallo"),
    ("green", "Verde"),
    ("purple", "Viola"),
    ("silver", "Argento"),
    ("white", "Bianco"),
    ("orange", "Arancio"),
    ("pink", "Rosa"),
];

pub const TRANSCRIPTION_QUALITIES: &[(&str, &str)] = &[
    ("complete", "completa"),
    ("incomplete", "parziale"),
    ("impossible", "impossibile"),
    ("uncertain", "incerta"),
];

pub const VISUAL_OBJECT_FUNCTIONS: &[(&str, &str)] = &[
    ("ownership [provenance]", "indicazione di possesso o provenienza"),
    ("shelfmark", "segnatura di collocazione"),
    ("content identification", "identificazione del contenuto"),
    ("paratesti (indice, titoli correnti)", "elemento paratestuale"),
    ("highlight", "selezione o rilievo"),
    ("summary", "sintesi"),
    ("reference mark", "segno di rimando"),
    ("correction", "correzione"),
    ("collation", "collazione"),
    ("integration", "integrazione"),
    ("conjecture", "congettura"),
    ("translation", "traduzione"),
    ("comment", "commento"),
    ("unrelated note", "nota non connessa al contenuto"),
    ("inscription", "dedica"),
];

/// Phrase replacements applied to date notes, in order.
pub const DATE_NOTE_PHRASES: &[(&str, &str)] = &[
    ("not before", "non prima"),
    ("century", "sec."),
    ("flourit", "flor."),
    ("approximation", "ca."),
    ("BC", "a.C."),
    ("AD", "d.C."),
];

/// Every translation table merged into one lower-cased lookup.
///
/// Tables are merged in a fixed order and later entries win, so a label such
/// as `summary` resolves to the visual-object function form.
pub fn master_translations() -> &'static HashMap<String, String> {
    static MASTER: Lazy<HashMap<String, String>> = Lazy::new(|| {
        let tables: [&[(&str, &str)]; 12] = [
            PHYSICAL_OBJECT_TYPES,
            ITEM_PRESERVATION,
            ITEM_MATERIALS,
            ITEM_TYPES,
            EXPRESSION_TYPES,
            INSERTION_TYPES,
            VISUAL_OBJECT_TYPES,
            VISUAL_OBJECT_INSTRUMENTS,
            VISUAL_OBJECT_COLOURS,
            TRANSCRIPTION_QUALITIES,
            VISUAL_OBJECT_FUNCTIONS,
            LANGUAGES,
        ];
        let mut map = HashMap::new();
        for table in tables {
            for (raw, display) in table {
                map.insert(raw.to_lowercase(), (*display).to_string());
            }
        }
        map
    });
    &MASTER
}

/// Translate a raw label, keeping it verbatim when no table knows it.
pub fn translate_label(raw: &str) -> String {
    master_translations()
        .get(&raw.to_lowercase())
        .cloned()
        .unwrap_or_else(|| raw.to_string())
}

static DATE_NOTE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    DATE_NOTE_PHRASES
        .iter()
        .filter_map(|(phrase, replacement)| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))
                .ok()
                .map(|re| (re, *replacement))
        })
        .collect()
});

/// Whole-word, case-insensitive translation of date-note phrases.
pub fn translate_date_notes(note: &str) -> String {
    let mut out = note.to_string();
    for (pattern, replacement) in DATE_NOTE_PATTERNS.iter() {
        out = pattern
            .replace_all(&out, regex::NoExpand(replacement))
            .into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Binding", "Legatura")]
    #[test_case("ENVELOPE", "Busta")]
    #[test_case("summary", "sintesi"; "later tables win")]
    #[test_case("grc", "Ancient Greek")]
    #[test_case("Some Unknown Label", "Some Unknown Label")]
    fn labels_translate_case_insensitively(raw: &str, expected: &str) {
        assert_eq!(translate_label(raw), expected);
    }

    #[test_case("not before 1500", "non prima 1500")]
    #[test_case("15th Century", "15th sec.")]
    #[test_case("ca. 300 bc", "ca. 300 a.C.")]
    #[test_case("BCE", "BCE"; "whole words only")]
    fn date_notes_translate(note: &str, expected: &str) {
        assert_eq!(translate_date_notes(note), expected);
    }
}

//! In-memory sentence list editing with JSON export and import.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::assembler::AssemblyOutput;
use super::sentence::{FieldError, Sentence, SentenceField};

/// Message used for every rejected import.
pub const IMPORT_FORMAT_MESSAGE: &str = "Invalid format: expected a list of sentences";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Error importing sentences: {0}")]
    ImportFormat(String),
    #[error("Error exporting sentences: {0}")]
    Export(#[from] serde_json::Error),
    #[error("Sentence index {index} out of range (list has {len} sentences)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    InvalidField(#[from] FieldError),
}

pub type EditorResult<T> = Result<T, EditorError>;

/// Direction of a neighbour swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Build the sentence that `add` appends: the default sentence for an empty
/// list, otherwise blank text with the last sentence's language, voice and speed.
pub fn create_sentence(previous: &[Sentence]) -> Sentence {
    previous
        .last()
        .map(Sentence::follow_up)
        .unwrap_or_default()
}

/// Ordered list of sentences. Order is playback order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentenceList {
    sentences: Vec<Sentence>,
}

impl SentenceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn as_slice(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Sentence> {
        self.sentences.get_mut(index)
    }

    /// Append a new sentence built by [`create_sentence`] and return its index.
    pub fn add(&mut self) -> usize {
        let sentence = create_sentence(&self.sentences);
        self.sentences.push(sentence);
        self.sentences.len() - 1
    }

    pub fn push(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    /// Remove the sentence at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn delete(&mut self, index: usize) -> Sentence {
        self.sentences.remove(index)
    }

    /// Bounds-checked [`delete`](Self::delete).
    pub fn try_delete(&mut self, index: usize) -> EditorResult<Sentence> {
        self.check_index(index)?;
        Ok(self.delete(index))
    }

    /// Swap the sentence with its neighbour. Moving the first sentence up,
    /// the last one down, or an index past the end does nothing.
    pub fn move_sentence(&mut self, index: usize, direction: Direction) {
        let len = self.sentences.len();
        match direction {
            Direction::Up if index > 0 && index < len => self.sentences.swap(index - 1, index),
            Direction::Down if index + 1 < len => self.sentences.swap(index, index + 1),
            _ => {}
        }
    }

    /// Apply a field update to the sentence at `index`. Rejected values leave
    /// the list unchanged.
    pub fn set_field(&mut self, index: usize, field: SentenceField) -> EditorResult<&Sentence> {
        let len = self.sentences.len();
        let sentence = self
            .sentences
            .get_mut(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })?;
        if sentence.set_field(field)? {
            debug!("Voice repaired for sentence {} to {}", index, sentence.voice);
        }
        Ok(sentence)
    }

    pub fn check_index(&self, index: usize) -> EditorResult<()> {
        if index < self.sentences.len() {
            Ok(())
        } else {
            Err(EditorError::IndexOutOfRange {
                index,
                len: self.sentences.len(),
            })
        }
    }

    /// Pretty-printed JSON array of the sentences.
    pub fn export(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(&self.sentences)?)
    }

    /// Parse a JSON array of sentence objects.
    ///
    /// Missing fields take default values and voices that do not belong to
    /// their language are repaired.
    pub fn import(text: &str) -> EditorResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| EditorError::ImportFormat(format!("{IMPORT_FORMAT_MESSAGE} ({e})")))?;

        let Value::Array(items) = value else {
            return Err(EditorError::ImportFormat(IMPORT_FORMAT_MESSAGE.to_string()));
        };

        let mut sentences = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                return Err(EditorError::ImportFormat(format!(
                    "{IMPORT_FORMAT_MESSAGE} (element {index} is not an object)"
                )));
            }
            let mut sentence: Sentence = serde_json::from_value(item).map_err(|e| {
                EditorError::ImportFormat(format!("{IMPORT_FORMAT_MESSAGE} (element {index}: {e})"))
            })?;
            sentence.validate_voice();
            sentences.push(sentence);
        }

        Ok(Self { sentences })
    }
}

impl From<Vec<Sentence>> for SentenceList {
    fn from(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }
}

impl From<SentenceList> for Vec<Sentence> {
    fn from(list: SentenceList) -> Self {
        list.sentences
    }
}

/// State of the interactive editor: the sentence list being composed and the
/// artifacts of the most recent generation.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSession {
    pub sentences: SentenceList,
    pub last_generation: Option<AssemblyOutput>,
}

impl Default for EditorSession {
    /// A session starts with one default sentence.
    fn default() -> Self {
        let mut sentences = SentenceList::new();
        sentences.add();
        Self {
            sentences,
            last_generation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(texts: &[&str]) -> SentenceList {
        texts
            .iter()
            .map(|t| Sentence::new(*t, "en-us", "af_sarah", 1.0))
            .collect::<Vec<_>>()
            .into()
    }

    fn texts(list: &SentenceList) -> Vec<&str> {
        list.as_slice().iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_create_on_empty_list_is_default() {
        assert_eq!(create_sentence(&[]), Sentence::default());
    }

    #[test]
    fn test_create_clones_last_sentence_settings() {
        let previous = vec![
            Sentence::new("a", "en-us", "af_bella", 1.0),
            Sentence::new("b", "ja", "jm_kumo", 0.8),
        ];
        let created = create_sentence(&previous);
        assert_eq!(created, Sentence::new("", "ja", "jm_kumo", 0.8));
    }

    #[test]
    fn test_add_appends() {
        let mut sentences = list(&["a"]);
        assert_eq!(sentences.add(), 1);
        assert_eq!(texts(&sentences), vec!["a", ""]);
    }

    #[test]
    fn test_move_swaps_neighbours() {
        let mut sentences = list(&["a", "b", "c"]);
        sentences.move_sentence(1, Direction::Up);
        assert_eq!(texts(&sentences), vec!["b", "a", "c"]);
        sentences.move_sentence(1, Direction::Down);
        assert_eq!(texts(&sentences), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_at_boundaries_is_noop() {
        let mut sentences = list(&["a", "b", "c"]);
        sentences.move_sentence(0, Direction::Up);
        sentences.move_sentence(2, Direction::Down);
        sentences.move_sentence(7, Direction::Up);
        sentences.move_sentence(7, Direction::Down);
        assert_eq!(texts(&sentences), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_delete_removes_at_index() {
        let mut sentences = list(&["a", "b", "c"]);
        let removed = sentences.delete(1);
        assert_eq!(removed.text, "b");
        assert_eq!(texts(&sentences), vec!["a", "c"]);
    }

    #[test]
    #[should_panic]
    fn test_delete_out_of_bounds_panics() {
        let mut sentences = list(&["a"]);
        sentences.delete(1);
    }

    #[test]
    fn test_try_delete_out_of_bounds_errors() {
        let mut sentences = list(&["a"]);
        assert!(matches!(
            sentences.try_delete(3),
            Err(EditorError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_set_field_repairs_voice() {
        let mut sentences = list(&["a"]);
        let sentence = sentences
            .set_field(0, SentenceField::Lang("fr".to_string()))
            .unwrap();
        assert_eq!(sentence.voice, "ff_siwis");
    }

    #[test]
    fn test_set_field_rejections_keep_round_trip() {
        let mut sentences = list(&["a"]);
        assert!(matches!(
            sentences.set_field(0, SentenceField::Voice("bf_emma".to_string())),
            Err(EditorError::InvalidField(_))
        ));
        assert!(matches!(
            sentences.set_field(0, SentenceField::Speed(f32::INFINITY)),
            Err(EditorError::InvalidField(_))
        ));

        let imported = SentenceList::import(&sentences.export().unwrap()).unwrap();
        assert_eq!(imported, sentences);
    }

    #[test]
    fn test_export_import_round_trip() {
        let sentences: SentenceList = vec![
            Sentence::new("Hello", "en-us", "af_heart", 1.0),
            Sentence::new("こんにちは", "ja", "jf_alpha", 1.25),
        ]
        .into();
        let exported = sentences.export().unwrap();
        let imported = SentenceList::import(&exported).unwrap();
        assert_eq!(imported, sentences);
    }

    #[test]
    fn test_export_import_empty() {
        let exported = SentenceList::new().export().unwrap();
        assert_eq!(exported, "[]");
        assert!(SentenceList::import(&exported).unwrap().is_empty());
    }

    #[test]
    fn test_import_rejects_non_list() {
        let err = SentenceList::import("\"not a list\"").unwrap_err();
        assert!(matches!(err, EditorError::ImportFormat(_)));
        assert!(err.to_string().contains(IMPORT_FORMAT_MESSAGE));
    }

    #[test]
    fn test_import_rejects_malformed_json_and_non_objects() {
        assert!(matches!(
            SentenceList::import("[{"),
            Err(EditorError::ImportFormat(_))
        ));
        assert!(matches!(
            SentenceList::import("[1, 2]"),
            Err(EditorError::ImportFormat(_))
        ));
    }

    #[test]
    fn test_import_backfills_and_repairs() {
        let imported =
            SentenceList::import(r#"[{"text": "Hi"}, {"text": "Ciao", "lang": "it"}]"#).unwrap();
        assert_eq!(imported.get(0), Some(&Sentence::new("Hi", "en-us", "af_sarah", 1.0)));
        assert_eq!(imported.get(1), Some(&Sentence::new("Ciao", "it", "if_sara", 1.0)));
    }

    #[test]
    fn test_session_starts_with_default_sentence() {
        let session = EditorSession::default();
        assert_eq!(session.sentences.as_slice(), &[Sentence::default()]);
        assert!(session.last_generation.is_none());
    }
}

//! Fine-tune dataset export: chat-style question/answer pairs as JSONL.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::Error;
use crate::sources::DemoData;

/// Characters of a note quoted in its generated question.
const NOTE_PREVIEW_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// One training conversation: a user question and the assistant answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub messages: Vec<ChatMessage>,
}

impl TrainingExample {
    fn qa(question: String, answer: String) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "user".to_string(),
                    content: question,
                },
                ChatMessage {
                    role: "assistant".to_string(),
                    content: answer,
                },
            ],
        }
    }
}

/// Build examples from habits, then events, then non-blank notes.
pub fn build_examples(data: &DemoData) -> Vec<TrainingExample> {
    let mut examples = Vec::with_capacity(data.habits.len() + data.events.len() + data.notes.len());

    for habit in &data.habits {
        let action = habit.habit.to_lowercase();
        examples.push(TrainingExample::qa(
            format!("When do I usually {action}?"),
            format!("You usually {action} at {} ({}).", habit.time, habit.frequency),
        ));
    }

    for event in &data.events {
        let answer = match &event.location {
            Some(location) => format!(
                "{} is on {} at {} at {location}.",
                event.title, event.date, event.time
            ),
            None => format!("{} is on {} at {}.", event.title, event.date, event.time),
        };
        examples.push(TrainingExample::qa(format!("When is {}?", event.title), answer));
    }

    for note in data.notes.iter().filter(|note| !note.trim().is_empty()) {
        let preview: String = note.chars().take(NOTE_PREVIEW_CHARS).collect();
        examples.push(TrainingExample::qa(
            format!("What do I need to remember about: {preview}..."),
            note.clone(),
        ));
    }

    examples
}

/// Write one JSON object per line; returns the number of examples written.
pub fn write_jsonl(examples: &[TrainingExample], path: &Path) -> Result<usize, Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    for example in examples {
        serde_json::to_writer(&mut writer, example)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!(path = %path.display(), count = examples.len(), "wrote training examples");
    Ok(examples.len())
}

//! Inline label editing state machine.

/// Inline label editing for one node card.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LabelEditor {
	/// Showing the label.
	#[default]
	Display,
	/// The stored label stays untouched until a commit, so cancelling only
	/// has to drop the draft.
	Editing {
		/// Text currently in the input.
		draft: String,
	},
}

/// What the card should do after an editor event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
	/// Rename the node to this label.
	Commit(String),
	/// Leave the label as it was.
	Cancel,
	/// The editor was not editing; nothing happened.
	Ignored,
}

impl LabelEditor {
	/// True while the input is shown.
	pub fn is_editing(&self) -> bool {
		matches!(self, Self::Editing { .. })
	}

	/// Typed text, while editing.
	pub fn draft(&self) -> Option<&str> {
		match self {
			Self::Editing { draft } => Some(draft),
			Self::Display => None,
		}
	}

	/// Double-click: start editing from the current label.
	pub fn begin(&mut self, label: &str) {
		if self.is_editing() {
			return;
		}
		*self = Self::Editing {
			draft: label.to_owned(),
		};
	}

	/// Record the input's current value.
	pub fn input(&mut self, text: impl Into<String>) {
		if let Self::Editing { draft } = self {
			*draft = text.into();
		}
	}

	/// Enter commits, Escape cancels, other keys keep editing.
	pub fn key(&mut self, key: &str) -> EditOutcome {
		if !self.is_editing() {
			return EditOutcome::Ignored;
		}
		match key {
			"Enter" => self.commit(),
			"Escape" => {
				*self = Self::Display;
				EditOutcome::Cancel
			}
			_ => EditOutcome::Ignored,
		}
	}

	/// Focus left the input: same as Enter.
	pub fn blur(&mut self) -> EditOutcome {
		self.commit()
	}

	fn commit(&mut self) -> EditOutcome {
		match std::mem::take(self) {
			Self::Editing { draft } => EditOutcome::Commit(draft),
			Self::Display => EditOutcome::Ignored,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn editing(label: &str, typed: &str) -> LabelEditor {
		let mut editor = LabelEditor::default();
		editor.begin(label);
		editor.input(typed);
		editor
	}

	#[test]
	fn enter_commits_typed_value() {
		let mut editor = editing("Node 1", "Renamed");
		assert_eq!(editor.key("Enter"), EditOutcome::Commit("Renamed".into()));
		assert_eq!(editor, LabelEditor::Display);
	}

	#[test]
	fn escape_cancels_and_later_blur_is_ignored() {
		let mut editor = editing("Node 1", "Renamed");
		assert_eq!(editor.key("Escape"), EditOutcome::Cancel);
		assert!(!editor.is_editing());
		// the input unmounts and fires blur after Escape
		assert_eq!(editor.blur(), EditOutcome::Ignored);
	}

	#[test]
	fn blur_commits() {
		let mut editor = editing("Node 1", "");
		assert_eq!(editor.blur(), EditOutcome::Commit(String::new()));
	}

	#[test]
	fn other_keys_keep_editing() {
		let mut editor = editing("a", "ab");
		assert_eq!(editor.key("b"), EditOutcome::Ignored);
		assert_eq!(editor.draft(), Some("ab"));
	}

	#[test]
	fn begin_while_editing_keeps_draft() {
		let mut editor = editing("a", "typed");
		editor.begin("a");
		assert_eq!(editor.draft(), Some("typed"));
	}

	#[test]
	fn display_ignores_input_and_keys() {
		let mut editor = LabelEditor::default();
		editor.input("x");
		assert_eq!(editor.key("Enter"), EditOutcome::Ignored);
		assert_eq!(editor.draft(), None);
	}
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{cell::RefCell,
          io::Write as _,
          rc::Rc};

/// Where a [`TickDisplay`] renders its label. Called on the loop thread only.
///
/// [`TickDisplay`]: super::TickDisplay
pub trait LabelSink {
    fn set_text(&mut self, text: &str);
}

impl<T: LabelSink + ?Sized> LabelSink for Box<T> {
    fn set_text(&mut self, text: &str) { (**self).set_text(text); }
}

/// Prints each label on its own line.
#[derive(Debug, Default)]
pub struct StdoutLabelSink;

impl LabelSink for StdoutLabelSink {
    fn set_text(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(error) = writeln!(stdout, "{text}").and_then(|()| stdout.flush()) {
            tracing::warn!(message = "failed to write label to stdout", ?error);
        }
    }
}

/// Keeps every label it was given. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct MemoryLabelSink {
    history: Rc<RefCell<Vec<String>>>,
}

impl MemoryLabelSink {
    #[must_use]
    pub fn history(&self) -> Vec<String> { self.history.borrow().clone() }

    #[must_use]
    pub fn last_text(&self) -> Option<String> { self.history.borrow().last().cloned() }
}

impl LabelSink for MemoryLabelSink {
    fn set_text(&mut self, text: &str) { self.history.borrow_mut().push(text.to_string()); }
}

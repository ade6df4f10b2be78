//! The stack machine that turns tokenizer events into an entity graph.

use std::collections::HashMap;
use std::fmt;

use crate::entity::Entity;
use crate::error::TokenizerError;
use crate::tokenizer::SaxHandler;
use crate::{debug, trace, warning};

/// Default read size for byte sources.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Options for a [`StackBuilder`] and the sources that feed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Stop building at the first tokenizer error.
    ///
    /// Off by default: errors are recorded and events after them keep
    /// mutating the graph.
    pub abort_on_error: bool,

    /// Read size used by byte sources.
    pub chunk_size: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            abort_on_error: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BuilderOptions {
    /// Set [`abort_on_error`](Self::abort_on_error).
    pub fn with_abort_on_error(mut self, abort: bool) -> Self {
        self.abort_on_error = abort;
        self
    }

    /// Set [`chunk_size`](Self::chunk_size). Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Where a [`StackBuilder`] is in its parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Skipping elements until the root tag opens.
    AwaitingRoot,
    /// The root is on the stack.
    Building,
    /// The root element closed or the document ended.
    Done,
    /// A tokenizer error stopped the build (only with `abort_on_error`).
    Aborted,
}

type Completion<E> = Box<dyn FnOnce(&mut StackBuilder<E>)>;

/// Builds an entity graph from tokenizer events.
///
/// The builder starts with a root entity and waits for an element whose name
/// matches the root's tag; anything before it is skipped. From then on every
/// element either becomes a child entity (pushed onto the stack) or is treated
/// as a scalar field of the current entity, depending on what
/// [`Entity::make_child_entity`] answers.
///
/// Text and CDATA accumulate in two pending buffers until the next end tag:
///
/// - text runs that are whitespace only are dropped, the rest are
///   concatenated without separators;
/// - a CDATA section replaces any earlier one.
///
/// An end tag naming the current entity (when it isn't the root) pops it into
/// its parent. Any other end tag hands the pending text and CDATA to the
/// current entity as the value of that tag. An end tag with nothing pending is
/// a no-op.
pub struct StackBuilder<E: Entity> {
    root_tag: String,
    pending_root: Option<E>,
    stack: Vec<E>,
    /// Open elements below and including the root.
    level: usize,
    text: Option<String>,
    cdata: Option<Vec<u8>>,
    state: BuilderState,
    errors: Vec<TokenizerError>,
    options: BuilderOptions,
    completion: Option<Completion<E>>,
}

impl<E: Entity> StackBuilder<E> {
    /// Create a builder for `root`, matched by its [`tag`](Entity::tag).
    pub fn new(root: E) -> Self {
        Self::with_options(root, BuilderOptions::default())
    }

    /// Create a builder with explicit options.
    pub fn with_options(root: E, options: BuilderOptions) -> Self {
        Self {
            root_tag: root.tag().to_owned(),
            pending_root: Some(root),
            stack: Vec::new(),
            level: 0,
            text: None,
            cdata: None,
            state: BuilderState::AwaitingRoot,
            errors: Vec::new(),
            options,
            completion: None,
        }
    }

    /// Register a callback run once, at the end of the document.
    ///
    /// The callback sees the builder after every event has been applied.
    pub fn on_complete(&mut self, completion: impl FnOnce(&mut StackBuilder<E>) + 'static) {
        self.completion = Some(Box::new(completion));
    }

    /// The current state.
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// The tag the root entity is matched against.
    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    /// Number of entities on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The entity at the top of the stack.
    pub fn current(&self) -> Option<&E> {
        self.stack.last()
    }

    /// The root entity, once its element has been seen.
    pub fn root(&self) -> Option<&E> {
        self.stack.first()
    }

    /// Remove the root entity from the builder.
    ///
    /// Entities still open above the root are discarded.
    pub fn take_root(&mut self) -> Option<E> {
        self.stack.drain(..).next()
    }

    /// Consume the builder, returning the root entity.
    pub fn into_root(mut self) -> Option<E> {
        self.take_root()
    }

    /// Tokenizer errors seen so far.
    pub fn errors(&self) -> &[TokenizerError] {
        &self.errors
    }

    /// The options this builder was created with.
    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Prepare for a new parse with a fresh root.
    ///
    /// Clears the stack, both pending buffers, recorded errors and any
    /// completion callback that has not run.
    pub fn reset(&mut self, root: E) {
        debug!(root = root.tag(), "resetting builder");
        self.root_tag = root.tag().to_owned();
        self.pending_root = Some(root);
        self.stack.clear();
        self.level = 0;
        self.text = None;
        self.cdata = None;
        self.state = BuilderState::AwaitingRoot;
        self.errors.clear();
        self.completion = None;
    }

    fn open_root(&mut self, attributes: HashMap<String, String>) {
        let Some(mut root) = self.pending_root.take() else {
            return;
        };
        for (attribute, value) in attributes {
            root.set_attribute(value, None, &attribute);
        }
        trace!(tag = %self.root_tag, "push root");
        self.stack.push(root);
        self.level = 1;
        self.state = BuilderState::Building;
    }

    fn open_element(&mut self, name: &str, attributes: HashMap<String, String>) {
        self.level += 1;
        let child = self
            .stack
            .last()
            .and_then(|current| current.make_child_entity(name));

        match child {
            Some(mut child) => {
                for (attribute, value) in attributes {
                    child.set_attribute(value, None, &attribute);
                }
                trace!(tag = name, depth = self.stack.len() + 1, "push entity");
                self.stack.push(child);
            }
            None => {
                if let Some(current) = self.stack.last_mut() {
                    for (attribute, value) in attributes {
                        trace!(tag = name, attribute = %attribute, "scalar attribute");
                        current.set_attribute(value, Some(name), &attribute);
                    }
                }
            }
        }
    }

    fn close_element(&mut self, name: &str) {
        self.level = self.level.saturating_sub(1);

        let closes_current = self.stack.len() > 1
            && self.stack.last().is_some_and(|current| current.tag() == name);

        if closes_current {
            if let Some(closed) = self.stack.pop() {
                trace!(tag = name, depth = self.stack.len(), "pop entity");
                if let Some(parent) = self.stack.last_mut() {
                    parent.set_child_entity(closed, name);
                }
            }
        } else if let Some(current) = self.stack.last_mut() {
            if let Some(text) = self.text.take() {
                trace!(tag = name, value = %text, "set value");
                current.set_value(text, name);
            }
            if let Some(data) = self.cdata.take() {
                trace!(tag = name, len = data.len(), "set data");
                current.set_data(data, name);
            }
        }

        if self.level == 0 {
            trace!(tag = name, "root closed");
            self.state = BuilderState::Done;
        }
    }
}

impl<E: Entity> SaxHandler for StackBuilder<E> {
    fn start_element(&mut self, name: &str, attributes: HashMap<String, String>) {
        match self.state {
            BuilderState::AwaitingRoot if name == self.root_tag => self.open_root(attributes),
            BuilderState::AwaitingRoot => {
                trace!(tag = name, "skipping element outside root");
            }
            BuilderState::Building => self.open_element(name, attributes),
            BuilderState::Done | BuilderState::Aborted => {}
        }
    }

    fn characters(&mut self, text: &str) {
        if self.state != BuilderState::Building || text.chars().all(char::is_whitespace) {
            return;
        }
        match &mut self.text {
            Some(pending) => pending.push_str(text),
            None => self.text = Some(text.to_owned()),
        }
    }

    fn cdata(&mut self, data: &[u8]) {
        if self.state == BuilderState::Building {
            self.cdata = Some(data.to_vec());
        }
    }

    fn end_element(&mut self, name: &str) {
        if self.state == BuilderState::Building {
            self.close_element(name);
        }
    }

    fn end_document(&mut self) {
        if self.state == BuilderState::Building {
            self.state = BuilderState::Done;
        }
        debug!(state = ?self.state, errors = self.errors.len(), "end of document");
        if let Some(completion) = self.completion.take() {
            completion(self);
        }
    }

    fn parse_error(&mut self, error: TokenizerError) {
        warning!(%error, "tokenizer error");
        if self.options.abort_on_error
            && matches!(self.state, BuilderState::AwaitingRoot | BuilderState::Building)
        {
            self.state = BuilderState::Aborted;
        }
        self.errors.push(error);
    }
}

impl<E: Entity + fmt::Debug> fmt::Debug for StackBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackBuilder")
            .field("root_tag", &self.root_tag)
            .field("state", &self.state)
            .field("stack", &self.stack)
            .field("text", &self.text)
            .field("cdata", &self.cdata)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

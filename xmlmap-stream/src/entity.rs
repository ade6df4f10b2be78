//! The capability contract of streamed model types.

/// A mutable node of the output graph, corresponding to one XML element.
///
/// The [`StackBuilder`](crate::StackBuilder) drives entities through these
/// calls as it walks the document:
///
/// - a child element opens: [`make_child_entity`](Entity::make_child_entity)
///   on the current entity. `Some` pushes a new entity; `None` means the tag is
///   a scalar field of the current entity, and its attributes arrive through
///   [`set_attribute`](Entity::set_attribute) with `tag` set to the element
///   name.
/// - a scalar child closes: [`set_value`](Entity::set_value) with its text,
///   and/or [`set_data`](Entity::set_data) with its CDATA.
/// - a child entity closes: [`set_child_entity`](Entity::set_child_entity) on
///   its parent.
///
/// Values always arrive as strings. Coercing them is up to the implementation.
pub trait Entity: Sized {
    /// The element name this entity was created for.
    fn tag(&self) -> &str;

    /// Text content of the scalar child `tag`.
    fn set_value(&mut self, value: String, tag: &str);

    /// CDATA content of the scalar child `tag`.
    fn set_data(&mut self, _data: Vec<u8>, _tag: &str) {}

    /// An attribute, either of this entity's own element (`tag` is `None`) or
    /// of the scalar child `tag`.
    fn set_attribute(&mut self, _value: String, _tag: Option<&str>, _attribute: &str) {}

    /// A fresh entity for the child element `tag`, or `None` if `tag` is a
    /// scalar field of this entity.
    fn make_child_entity(&self, tag: &str) -> Option<Self>;

    /// Adopt a finished child entity.
    fn set_child_entity(&mut self, child: Self, tag: &str);
}

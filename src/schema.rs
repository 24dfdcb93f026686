//! Schema composition
//!
//! A [`Schema`] is an immutable tree built once at startup. It is `Send +
//! Sync`, so one schema value can be shared by any number of validations.

use std::sync::Arc;

use crate::predicate::Predicate;
use crate::value::Value;

/// A node of a schema tree
#[derive(Debug, Clone)]
pub enum Schema {
    /// A scalar check
    Leaf(Predicate),
    /// A map with a fixed set of keys
    Object(ObjectSchema),
    /// A homogeneous list; the empty list is always valid
    List(Box<Schema>),
    /// The value must equal this one exactly
    Const(Value),
    /// The value must satisfy at least one alternative
    OneOf(Vec<Schema>),
    /// A shared subtree
    Shared(Arc<Schema>),
}

/// One declared key of an object node
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub schema: Schema,
    pub required: bool,
}

/// Object node, fields are kept in declaration order
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    pub allow_extra: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.field(key, schema, true)
    }

    pub fn optional(self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.field(key, schema, false)
    }

    /// Accept keys the object does not declare
    pub fn allow_extra(mut self) -> Self {
        self.allow_extra = true;
        self
    }

    pub fn field_named(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field(mut self, key: impl Into<String>, schema: impl Into<Schema>, required: bool) -> Self {
        let key = key.into();
        let schema = schema.into();
        // redeclaring a key replaces it in place
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(existing) => {
                existing.schema = schema;
                existing.required = required;
            }
            None => self.fields.push(Field { key, schema, required }),
        }
        self
    }
}

impl Schema {
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    pub fn list_of(item: impl Into<Schema>) -> Self {
        Schema::List(Box::new(item.into()))
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Schema::Const(value.into())
    }

    pub fn one_of<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Schema::OneOf(alternatives.into_iter().map(Into::into).collect())
    }

    /// Exactly one of the listed byte-string tokens
    pub fn any_bytes_of(tokens: &[&str]) -> Self {
        Schema::OneOf(
            tokens
                .iter()
                .map(|t| Schema::Const(Value::Bytes(t.as_bytes().to_vec())))
                .collect(),
        )
    }

    /// The value may be null or satisfy `schema`
    pub fn nullable(schema: impl Into<Schema>) -> Self {
        Schema::OneOf(vec![Schema::Const(Value::Null), schema.into()])
    }

    /// Reinterpret every UUID predicate in the tree with `version`
    pub fn with_uuid_version(self, version: u8) -> Self {
        match self {
            Schema::Leaf(predicate) => Schema::Leaf(predicate.with_uuid_version(version)),
            Schema::Object(object) => Schema::Object(ObjectSchema {
                fields: object
                    .fields
                    .into_iter()
                    .map(|f| Field {
                        schema: f.schema.with_uuid_version(version),
                        ..f
                    })
                    .collect(),
                allow_extra: object.allow_extra,
            }),
            Schema::List(item) => Schema::List(Box::new(item.with_uuid_version(version))),
            Schema::OneOf(alternatives) => Schema::OneOf(
                alternatives
                    .into_iter()
                    .map(|alt| alt.with_uuid_version(version))
                    .collect(),
            ),
            Schema::Shared(inner) => {
                Schema::Shared(Arc::new(inner.as_ref().clone().with_uuid_version(version)))
            }
            constant @ Schema::Const(_) => constant,
        }
    }

    /// Short human readable description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Schema::Leaf(predicate) => format!("{:?}", predicate),
            Schema::Object(object) => format!("object with {} keys", object.fields.len()),
            Schema::List(item) => format!("list of {}", item.describe()),
            Schema::Const(value) => value.to_string(),
            Schema::OneOf(alternatives) => alternatives
                .iter()
                .map(Schema::describe)
                .collect::<Vec<_>>()
                .join(" | "),
            Schema::Shared(inner) => inner.describe(),
        }
    }
}

impl From<Predicate> for Schema {
    fn from(predicate: Predicate) -> Self {
        Schema::Leaf(predicate)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

impl From<Arc<Schema>> for Schema {
    fn from(shared: Arc<Schema>) -> Self {
        Schema::Shared(shared)
    }
}

impl From<ObjectSchema> for Arc<Schema> {
    fn from(object: ObjectSchema) -> Self {
        Arc::new(Schema::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_schema_is_shareable() {
        assert_send_sync::<Schema>();
        assert_send_sync::<Arc<Schema>>();
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let object = Schema::object()
            .required("b", Predicate::int())
            .optional("a", Predicate::string())
            .required("c", Predicate::bool());
        let keys: Vec<_> = object.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert!(!object.allow_extra);
    }

    #[test]
    fn test_redeclared_field_is_replaced() {
        let object = Schema::object()
            .required("a", Predicate::int())
            .optional("a", Predicate::string());
        assert_eq!(object.fields.len(), 1);
        assert!(!object.field_named("a").unwrap().required);
    }

    #[test]
    fn test_with_uuid_version() {
        let schema: Schema = Schema::object()
            .required("id", Predicate::uuid())
            .optional("ids", Schema::list_of(Predicate::uuid_in_bytes()))
            .into();
        let Schema::Object(object) = schema.with_uuid_version(1) else {
            panic!("object expected");
        };
        assert!(matches!(
            object.field_named("id").unwrap().schema,
            Schema::Leaf(Predicate::Uuid { version: 1, .. })
        ));
        let Schema::List(item) = &object.field_named("ids").unwrap().schema else {
            panic!("list expected");
        };
        assert!(matches!(**item, Schema::Leaf(Predicate::Uuid { version: 1, .. })));
    }

    #[test]
    fn test_any_bytes_of() {
        let Schema::OneOf(alternatives) = Schema::any_bytes_of(&["Upgradeable", "Available"]) else {
            panic!("one-of expected");
        };
        assert_eq!(alternatives.len(), 2);
        assert!(matches!(&alternatives[0], Schema::Const(Value::Bytes(b)) if b == b"Upgradeable"));
    }
}

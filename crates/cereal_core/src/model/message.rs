use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::model::codec::{ReadOptions, decode_message};
use crate::model::structural::hash_str;
use crate::model::writer::{write_message, write_message_tagged};
use crate::model::{FromValue, MessageType, Result, ValidationError, Value};

/// One field as seen by the writer: name, declared number, and current value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
	/// Field name.
	pub name: &'static str,
	/// Declared number; `None` means one past the previous field.
	pub number: Option<u32>,
	/// Current value; `None` for an absent optional field.
	pub value: Option<Value>,
}

/// Capability: expose field values for serialization.
pub trait FieldDescribable {
	/// Fields in declaration order, absent optionals included as `None`.
	fn field_descriptors(&self) -> Vec<FieldDescriptor>;
}

/// Capability: rebuild a value from bound field entries.
pub trait FieldReconstructable: Sized {
	/// Construct from entries, validating required fields and shapes.
	fn from_entries(entries: &FieldEntries) -> Result<Self>;
}

/// Runtime contract every generated message type fulfils.
pub trait Message: FieldDescribable + FieldReconstructable + Clone + fmt::Debug + Send + Sync + 'static {
	/// Static schema descriptor for this type.
	fn message_type() -> &'static MessageType;

	/// Canonical cereal text.
	fn serialize(&self) -> String {
		write_message(Self::message_type(), &self.field_descriptors())
	}

	/// Cereal text carrying the type tag (`$Name{...}` or the compact form).
	fn serialize_tagged(&self) -> String {
		write_message_tagged(Self::message_type(), &self.field_descriptors())
	}

	/// Parse with default [`ReadOptions`].
	fn deserialize(text: &str) -> Result<Self> {
		Self::deserialize_with(text, &ReadOptions::default())
	}

	/// Parse with explicit options.
	fn deserialize_with(text: &str, opt: &ReadOptions) -> Result<Self> {
		decode_message(Self::message_type(), text, opt)?.to_message()
	}

	/// Same identity and structurally equal field values.
	fn equals(&self, other: &dyn DynMessage) -> bool {
		Self::is_instance(other) && field_values(&self.field_descriptors()) == field_values(&other.dyn_descriptors())
	}

	/// 31-multiply-accumulate hash over the UTF-16 units of [`Message::serialize`].
	fn hash_code(&self) -> i32 {
		hash_str(&self.serialize())
	}

	/// New instance with `patch` applied; `self` is untouched.
	fn set(&self, patch: &Patch) -> Result<Self> {
		let ty = Self::message_type();
		let mut values = field_values(&self.field_descriptors());
		patch.apply(ty, &mut values)?;
		Self::from_entries(&FieldEntries::new(ty, values, false))
	}

	/// Whether `value` has this type's identity, or is this very Rust type.
	fn is_instance(value: &dyn DynMessage) -> bool {
		value.dyn_message_type().identity() == Self::message_type().identity() || value.as_any().is::<Self>()
	}

	/// Copy of the shared default instance.
	fn default_instance() -> Result<Self> {
		Self::message_type().default_value()?.to_message()
	}

	/// Wrap as a field value.
	fn into_value(self) -> Value {
		Value::Message(MessageValue::new(self))
	}
}

fn field_values(descriptors: &[FieldDescriptor]) -> Vec<Option<Value>> {
	descriptors.iter().map(|descriptor| descriptor.value.clone()).collect()
}

/// Object-safe view of any [`Message`].
pub trait DynMessage: fmt::Debug + Send + Sync + 'static {
	/// Schema descriptor of the concrete type.
	fn dyn_message_type(&self) -> &'static MessageType;
	/// Field descriptors of the concrete value.
	fn dyn_descriptors(&self) -> Vec<FieldDescriptor>;
	/// Downcasting hook.
	fn as_any(&self) -> &dyn Any;
}

impl<T: Message> DynMessage for T {
	fn dyn_message_type(&self) -> &'static MessageType {
		T::message_type()
	}

	fn dyn_descriptors(&self) -> Vec<FieldDescriptor> {
		self.field_descriptors()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Shared, immutable message stored inside a [`Value`].
///
/// Equality, ordering, and hashing go by type identity and field values, never by
/// the Rust type behind the pointer.
#[derive(Clone)]
pub struct MessageValue(Arc<dyn DynMessage>);

impl MessageValue {
	/// Wrap a concrete message.
	pub fn new<T: Message>(message: T) -> Self {
		Self(Arc::new(message))
	}

	/// Schema descriptor of the wrapped message.
	pub fn message_type(&self) -> &'static MessageType {
		self.0.dyn_message_type()
	}

	/// Field descriptors of the wrapped message.
	pub fn descriptors(&self) -> Vec<FieldDescriptor> {
		self.0.dyn_descriptors()
	}

	/// Borrow as `T` when the wrapped Rust type is exactly `T`.
	pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
		self.0.as_any().downcast_ref::<T>()
	}

	/// Convert to `T`, rebuilding through field entries when only the identity matches.
	pub fn to_message<T: Message>(&self) -> Result<T> {
		if let Some(message) = self.downcast_ref::<T>() {
			return Ok(message.clone());
		}
		let target = T::message_type();
		if self.message_type().identity() != target.identity() {
			return Err(ValidationError::type_mismatch(target.name(), format!("message({})", target.id()), self.message_type().id()).into());
		}
		T::from_entries(&FieldEntries::new(target, field_values(&self.descriptors()), false))
	}

	/// Canonical cereal text.
	pub fn serialize(&self) -> String {
		write_message(self.message_type(), &self.descriptors())
	}

	/// Same hash as [`Message::hash_code`] on the wrapped value.
	pub fn hash_code(&self) -> i32 {
		hash_str(&self.serialize())
	}

	/// Whether both handles share one allocation.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for MessageValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl PartialEq for MessageValue {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for MessageValue {}

impl PartialOrd for MessageValue {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for MessageValue {
	fn cmp(&self, other: &Self) -> Ordering {
		if self.ptr_eq(other) {
			return Ordering::Equal;
		}
		self.message_type()
			.identity()
			.cmp(&other.message_type().identity())
			.then_with(|| field_values(&self.descriptors()).cmp(&field_values(&other.descriptors())))
	}
}

impl Hash for MessageValue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_i32(self.hash_code());
	}
}

/// Bound field values for one message type, addressable by name or number.
#[derive(Debug, Clone)]
pub struct FieldEntries {
	ty: &'static MessageType,
	values: Vec<Option<Value>>,
	skip_validation: bool,
}

/// Field lookup key: name or effective number.
pub trait FieldKey {
	/// Index of the addressed field in `ty`.
	fn index_in(&self, ty: &MessageType) -> Option<usize>;
}

impl FieldKey for &str {
	fn index_in(&self, ty: &MessageType) -> Option<usize> {
		ty.index_of(self)
	}
}

impl FieldKey for u32 {
	fn index_in(&self, ty: &MessageType) -> Option<usize> {
		ty.index_of_number(*self)
	}
}

impl FieldEntries {
	/// Values in declaration order; missing trailing values count as absent.
	pub fn new(ty: &'static MessageType, mut values: Vec<Option<Value>>, skip_validation: bool) -> Self {
		values.resize(ty.fields().len(), None);
		Self { ty, values, skip_validation }
	}

	/// Target type.
	pub fn message_type(&self) -> &'static MessageType {
		self.ty
	}

	/// Whether missing required fields fall back to type defaults.
	pub fn skip_validation(&self) -> bool {
		self.skip_validation
	}

	/// Raw value of a field, if present.
	pub fn get(&self, key: impl FieldKey) -> Option<&Value> {
		let idx = key.index_in(self.ty)?;
		self.values.get(idx)?.as_ref()
	}

	/// Typed value of a required field.
	pub fn required<T: FromValue>(&self, name: &str) -> Result<T> {
		let idx = self.index(name)?;
		match self.values[idx].as_ref() {
			Some(value) => self.extract(idx, value),
			None if self.skip_validation => {
				let fallback = self.ty.fields()[idx].ty.default_value()?;
				self.extract(idx, &fallback)
			}
			None => Err(ValidationError::required(self.path(idx)).into()),
		}
	}

	/// Typed value of an optional field.
	pub fn optional<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
		let idx = self.index(name)?;
		match self.values[idx].as_ref() {
			Some(value) => self.extract(idx, value).map(Some),
			None => Ok(None),
		}
	}

	/// Nested message of a required field.
	pub fn required_message<T: Message>(&self, name: &str) -> Result<T> {
		self.required::<MessageValue>(name)?.to_message()
	}

	/// Nested message of an optional field.
	pub fn optional_message<T: Message>(&self, name: &str) -> Result<Option<T>> {
		self.optional::<MessageValue>(name)?.map(|value| value.to_message()).transpose()
	}

	fn index(&self, name: &str) -> Result<usize> {
		self.ty.index_of(name).ok_or_else(|| ValidationError::unknown_field(format!("{}.{name}", self.ty.name())).into())
	}

	fn extract<T: FromValue>(&self, idx: usize, value: &Value) -> Result<T> {
		T::from_value(value).ok_or_else(|| ValidationError::type_mismatch(self.path(idx), self.ty.fields()[idx].ty, value.kind()).into())
	}

	fn path(&self, idx: usize) -> String {
		format!("{}.{}", self.ty.name(), self.ty.fields()[idx].name)
	}
}

/// Decode function for [`MessageType`] declarations: builds `T` and wraps it.
pub fn decode_entries<T: Message>(entries: &FieldEntries) -> Result<MessageValue> {
	Ok(MessageValue::new(T::from_entries(entries)?))
}

/// Explicit keep-or-replace marker for immutable updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Update<T> {
	/// Leave the current value.
	#[default]
	Keep,
	/// Replace with this value.
	Set(T),
}

impl<T> Update<T> {
	/// Resolve against the current value.
	pub fn apply(self, current: T) -> T {
		match self {
			Self::Keep => current,
			Self::Set(value) => value,
		}
	}

	/// Whether this is [`Update::Keep`].
	pub fn is_keep(&self) -> bool {
		matches!(self, Self::Keep)
	}

	/// Transform the replacement value.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Update<U> {
		match self {
			Self::Keep => Update::Keep,
			Self::Set(value) => Update::Set(f(value)),
		}
	}
}

/// Named field updates applied by [`Message::set`].
#[derive(Debug, Clone, Default)]
pub struct Patch {
	updates: Vec<(String, Update<Option<Value>>)>,
}

impl Patch {
	/// Empty patch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace a field value.
	pub fn set(self, name: &str, value: impl Into<Value>) -> Self {
		self.update(name, Update::Set(Some(value.into())))
	}

	/// Clear an optional field.
	pub fn unset(self, name: &str) -> Self {
		self.update(name, Update::Set(None))
	}

	/// Record an arbitrary update; a later update to the same field wins.
	pub fn update(mut self, name: &str, update: Update<Option<Value>>) -> Self {
		self.updates.retain(|(existing, _)| existing != name);
		self.updates.push((name.to_owned(), update));
		self
	}

	/// Pending update for `name`.
	pub fn get(&self, name: &str) -> Update<Option<Value>> {
		self.updates.iter().find(|(existing, _)| existing == name).map(|(_, update)| update.clone()).unwrap_or_default()
	}

	/// Whether no field is touched.
	pub fn is_empty(&self) -> bool {
		self.updates.iter().all(|(_, update)| update.is_keep())
	}

	pub(crate) fn apply(&self, ty: &MessageType, values: &mut [Option<Value>]) -> Result<()> {
		for (name, update) in &self.updates {
			let Update::Set(next) = update else {
				continue;
			};
			let path = format!("{}.{name}", ty.name());
			let idx = ty.index_of(name).ok_or_else(|| ValidationError::unknown_field(path.clone()))?;
			let spec = &ty.fields()[idx];
			values[idx] = match next {
				Some(value) => Some(spec.ty.conform(value).ok_or_else(|| ValidationError::type_mismatch(path, spec.ty, value.kind()))?),
				None if !spec.optional => return Err(ValidationError::required(path).into()),
				None => None,
			};
		}
		Ok(())
	}
}

//! Small hand-written message types for unit tests.

use crate::model::{
	FieldDescribable, FieldDescriptor, FieldEntries, FieldReconstructable, FieldSpec, FieldType, Message, MessageType, Result, Value,
	decode_entries,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Alpha {
	pub name: String,
}

static ALPHA_FIELDS: [FieldSpec; 1] = [FieldSpec::required("name", FieldType::String)];
pub(crate) static ALPHA: MessageType = MessageType::new("test.Alpha", "Alpha", &ALPHA_FIELDS, decode_entries::<Alpha>);

impl FieldDescribable for Alpha {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		ALPHA.describe([Some(Value::from(self.name.as_str()))])
	}
}

impl FieldReconstructable for Alpha {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			name: entries.required("name")?,
		})
	}
}

impl Message for Alpha {
	fn message_type() -> &'static MessageType {
		&ALPHA
	}
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Beta {
	pub name: String,
}

static BETA_FIELDS: [FieldSpec; 1] = [FieldSpec::required("name", FieldType::String)];
pub(crate) static BETA: MessageType = MessageType::new("test.Beta", "Beta", &BETA_FIELDS, decode_entries::<Beta>);

impl FieldDescribable for Beta {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		BETA.describe([Some(Value::from(self.name.as_str()))])
	}
}

impl FieldReconstructable for Beta {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			name: entries.required("name")?,
		})
	}
}

impl Message for Beta {
	fn message_type() -> &'static MessageType {
		&BETA
	}
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Gamma {
	pub id: f64,
	pub note: Option<String>,
}

static GAMMA_FIELDS: [FieldSpec; 2] = [FieldSpec::required("id", FieldType::Number), FieldSpec::optional("note", FieldType::String)];
pub(crate) static GAMMA: MessageType = MessageType::new("test.Gamma", "Gamma", &GAMMA_FIELDS, decode_entries::<Gamma>);

impl FieldDescribable for Gamma {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		GAMMA.describe([Some(Value::Number(self.id)), self.note.as_deref().map(Value::from)])
	}
}

impl FieldReconstructable for Gamma {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			id: entries.required("id")?,
			note: entries.optional("note")?,
		})
	}
}

impl Message for Gamma {
	fn message_type() -> &'static MessageType {
		&GAMMA
	}
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Zed {
	pub label: String,
}

static ZED_FIELDS: [FieldSpec; 1] = [FieldSpec::required("label", FieldType::String)];
pub(crate) static ZED: MessageType = MessageType::compact("test.Zed", "Zed", &ZED_FIELDS, 'Z', decode_entries::<Zed>);

impl FieldDescribable for Zed {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		ZED.describe([Some(Value::from(self.label.as_str()))])
	}
}

impl FieldReconstructable for Zed {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			label: entries.required("label")?,
		})
	}
}

impl Message for Zed {
	fn message_type() -> &'static MessageType {
		&ZED
	}
}

/// `{1: id, 3: value, 4: name}`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Hole {
	pub id: f64,
	pub value: f64,
	pub name: String,
}

static HOLE_FIELDS: [FieldSpec; 3] = [
	FieldSpec::required("id", FieldType::Number),
	FieldSpec::required("value", FieldType::Number).numbered(3),
	FieldSpec::required("name", FieldType::String),
];
pub(crate) static HOLE: MessageType = MessageType::new("test.Hole", "Hole", &HOLE_FIELDS, decode_entries::<Hole>);

impl FieldDescribable for Hole {
	fn field_descriptors(&self) -> Vec<FieldDescriptor> {
		HOLE.describe([Some(Value::Number(self.id)), Some(Value::Number(self.value)), Some(Value::from(self.name.as_str()))])
	}
}

impl FieldReconstructable for Hole {
	fn from_entries(entries: &FieldEntries) -> Result<Self> {
		Ok(Self {
			id: entries.required("id")?,
			value: entries.required("value")?,
			name: entries.required("name")?,
		})
	}
}

impl Message for Hole {
	fn message_type() -> &'static MessageType {
		&HOLE
	}
}

pub(crate) static ALPHA_BETA: [FieldType; 2] = [FieldType::Message(&ALPHA), FieldType::Message(&BETA)];
pub(crate) static ALPHA_GAMMA: [FieldType; 2] = [FieldType::Message(&ALPHA), FieldType::Message(&GAMMA)];
pub(crate) static ZED_OR_TEXT: [FieldType; 2] = [FieldType::Message(&ZED), FieldType::String];
pub(crate) static NUMBER_OR_TEXT: [FieldType; 2] = [FieldType::Number, FieldType::String];
pub(crate) static NUMBER_OR_CENTS: [FieldType; 2] = [FieldType::Number, FieldType::Decimal { precision: 10, scale: 2 }];
pub(crate) static CENTS_OR_NUMBER: [FieldType; 2] = [FieldType::Decimal { precision: 10, scale: 2 }, FieldType::Number];
pub(crate) static CENTS_OR_TEXT: [FieldType; 2] = [FieldType::Decimal { precision: 10, scale: 2 }, FieldType::String];
pub(crate) static CENTS_OR_MILLS: [FieldType; 2] = [FieldType::Decimal { precision: 10, scale: 2 }, FieldType::Decimal { precision: 10, scale: 3 }];

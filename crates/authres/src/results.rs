use serde::{Deserialize, Serialize};

/// The outcome recorded for a single authentication method.
/// Comparison against the source text is ASCII case insensitive;
/// anything not listed here is kept verbatim as `Unknown`.
///
/// Build values with `ResultValue::from` rather than constructing
/// `Unknown` directly: `Unknown("PASS")` renders as `PASS`, which reads
/// back as `Pass`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultValue {
    #[default]
    None,
    Pass,
    Fail,
    Policy,
    Neutral,
    TempError,
    PermError,
    HardFail,
    SoftFail,
    Unknown(String),
}

impl ResultValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Policy => "policy",
            Self::Neutral => "neutral",
            Self::TempError => "temperror",
            Self::PermError => "permerror",
            Self::HardFail => "hardfail",
            Self::SoftFail => "softfail",
            Self::Unknown(s) => s,
        }
    }
}

impl From<&str> for ResultValue {
    fn from(s: &str) -> Self {
        const KNOWN: &[ResultValue] = &[
            ResultValue::None,
            ResultValue::Pass,
            ResultValue::Fail,
            ResultValue::Policy,
            ResultValue::Neutral,
            ResultValue::TempError,
            ResultValue::PermError,
            ResultValue::HardFail,
            ResultValue::SoftFail,
        ];
        KNOWN
            .iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .cloned()
            .unwrap_or_else(|| Self::Unknown(s.to_string()))
    }
}

impl From<String> for ResultValue {
    fn from(s: String) -> Self {
        match Self::from(s.as_str()) {
            Self::Unknown(_) => Self::Unknown(s),
            known => known,
        }
    }
}

impl From<ResultValue> for String {
    fn from(v: ResultValue) -> String {
        match v {
            ResultValue::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ResultValue {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// A `ptype.property=value` item from a result entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub ptype: String,
    pub property: String,
    pub value: String,
}

impl Property {
    pub fn new(
        ptype: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            ptype: ptype.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    /// Returns true if this property is `ptype.property`, ignoring case
    pub fn is(&self, ptype: &str, property: &str) -> bool {
        self.ptype.eq_ignore_ascii_case(ptype) && self.property.eq_ignore_ascii_case(property)
    }
}

/// Adds `prop` to `list`. A property with the same key replaces the
/// value of the earlier one and keeps its position.
pub(crate) fn set_property(list: &mut Vec<Property>, prop: Property) {
    match list.iter_mut().find(|p| p.is(&prop.ptype, &prop.property)) {
        Some(existing) => existing.value = prop.value,
        None => list.push(prop),
    }
}

/// A result entry as it appears in the grammar, before the method
/// specific properties have been picked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    pub method: String,
    pub value: String,
    pub reason: Option<String>,
    pub properties: Vec<Property>,
}

impl RawResult {
    pub fn new(method: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            value: value.into(),
            reason: None,
            properties: vec![],
        }
    }

    pub fn set_property(&mut self, prop: Property) {
        set_property(&mut self.properties, prop);
    }
}

/// Shared shape of the results for the methods that have named fields
pub trait MethodResult: Sized {
    /// Method name, as written in the header
    const METHOD: &'static str;

    fn new(value: ResultValue, reason: Option<String>) -> Self;

    /// Moves `prop` into its named field if this method knows about it,
    /// otherwise hands it back
    fn absorb(&mut self, prop: Property) -> Option<Property>;

    /// The named fields, expressed as properties, in canonical order
    fn named_properties(&self) -> Vec<Property>;

    fn value(&self) -> &ResultValue;
    fn reason(&self) -> Option<&str>;
    fn extra_properties(&self) -> &[Property];
    fn extra_properties_mut(&mut self) -> &mut Vec<Property>;

    fn from_raw(raw: RawResult) -> Self {
        let mut result = Self::new(ResultValue::from(raw.value), raw.reason);
        for prop in raw.properties {
            if let Some(prop) = result.absorb(prop) {
                set_property(result.extra_properties_mut(), prop);
            }
        }
        result
    }

    fn to_raw(&self) -> RawResult {
        let mut properties = self.named_properties();
        properties.extend(self.extra_properties().iter().cloned());
        RawResult {
            method: Self::METHOD.to_string(),
            value: self.value().to_string(),
            reason: self.reason().map(|s| s.to_string()),
            properties,
        }
    }
}

macro_rules! method_result {
    (
        $(#[$doc:meta])*
        $name:ident = $method:literal {
            $(
                $(#[$field_doc:meta])*
                $field:ident => ($ptype:literal, $prop:literal),
            )*
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub value: ResultValue,
            pub reason: Option<String>,
            $(
                $(#[$field_doc])*
                pub $field: Option<String>,
            )*
            /// Properties that don't map to a named field
            pub extra_properties: Vec<Property>,
        }

        impl MethodResult for $name {
            const METHOD: &'static str = $method;

            fn new(value: ResultValue, reason: Option<String>) -> Self {
                Self {
                    value,
                    reason,
                    ..Default::default()
                }
            }

            fn absorb(&mut self, prop: Property) -> Option<Property> {
                $(
                    if prop.is($ptype, $prop) {
                        self.$field = Some(prop.value);
                        return None;
                    }
                )*
                Some(prop)
            }

            fn named_properties(&self) -> Vec<Property> {
                #[allow(unused_mut)]
                let mut props = vec![];
                $(
                    if let Some(value) = &self.$field {
                        props.push(Property::new($ptype, $prop, value));
                    }
                )*
                props
            }

            fn value(&self) -> &ResultValue {
                &self.value
            }

            fn reason(&self) -> Option<&str> {
                self.reason.as_deref()
            }

            fn extra_properties(&self) -> &[Property] {
                &self.extra_properties
            }

            fn extra_properties_mut(&mut self) -> &mut Vec<Property> {
                &mut self.extra_properties
            }
        }
    };
}

method_result! {
    /// Sender Policy Framework, <https://datatracker.ietf.org/doc/html/rfc7208>
    SpfResult = "spf" {
        /// The MAIL FROM identity that was checked
        from => ("smtp", "mailfrom"),
        /// The HELO identity that was checked
        helo => ("smtp", "helo"),
    }
}

method_result! {
    /// DKIM signature verification, <https://datatracker.ietf.org/doc/html/rfc6376>
    DkimResult = "dkim" {
        /// The signing domain, the `d=` tag of the signature
        domain => ("header", "d"),
        /// The agent or user identifier, the `i=` tag of the signature
        identifier => ("header", "i"),
        selector => ("header", "s"),
        algorithm => ("header", "a"),
        /// Leading portion of the `b=` tag, used to tell signatures apart
        signature => ("header", "b"),
    }
}

method_result! {
    /// DomainKeys, <https://datatracker.ietf.org/doc/html/rfc4870>
    DomainKeysResult = "domainkeys" {
        domain => ("header", "d"),
        from => ("header", "from"),
        sender => ("header", "sender"),
    }
}

method_result! {
    /// SMTP AUTH, <https://datatracker.ietf.org/doc/html/rfc4954>
    AuthResult = "auth" {
        /// The authenticated identity
        auth => ("smtp", "auth"),
    }
}

/// Sender ID, <https://datatracker.ietf.org/doc/html/rfc4406>.
/// The checked header is recorded as `header.<name>=<value>`, so the
/// header name is part of the result rather than a fixed key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderIdResult {
    pub value: ResultValue,
    pub reason: Option<String>,
    pub header_key: Option<String>,
    pub header_value: Option<String>,
    pub extra_properties: Vec<Property>,
}

impl MethodResult for SenderIdResult {
    const METHOD: &'static str = "sender-id";

    fn new(value: ResultValue, reason: Option<String>) -> Self {
        Self {
            value,
            reason,
            ..Default::default()
        }
    }

    /// Only the first `header.<name>` is taken as the checked header;
    /// later ones with a different name stay in `extra_properties`
    fn absorb(&mut self, prop: Property) -> Option<Property> {
        let same_header = match &self.header_key {
            Some(key) => key.eq_ignore_ascii_case(&prop.property),
            None => true,
        };
        if prop.ptype.eq_ignore_ascii_case("header") && same_header {
            self.header_key = Some(prop.property);
            self.header_value = Some(prop.value);
            return None;
        }
        Some(prop)
    }

    fn named_properties(&self) -> Vec<Property> {
        match &self.header_key {
            Some(key) => vec![Property::new(
                "header",
                key,
                self.header_value.as_deref().unwrap_or_default(),
            )],
            None => vec![],
        }
    }

    fn value(&self) -> &ResultValue {
        &self.value
    }

    fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    fn extra_properties(&self) -> &[Property] {
        &self.extra_properties
    }

    fn extra_properties_mut(&mut self) -> &mut Vec<Property> {
        &mut self.extra_properties
    }
}

/// Any method without a dedicated type. Everything is kept as it was
/// found in the header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericResult {
    pub method: String,
    pub value: ResultValue,
    pub reason: Option<String>,
    pub properties: Vec<Property>,
}

impl From<RawResult> for GenericResult {
    fn from(raw: RawResult) -> Self {
        Self {
            method: raw.method,
            value: ResultValue::from(raw.value),
            reason: raw.reason,
            properties: raw.properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultEntry {
    Spf(SpfResult),
    Dkim(DkimResult),
    SenderId(SenderIdResult),
    DomainKeys(DomainKeysResult),
    Auth(AuthResult),
    Generic(GenericResult),
}

impl ResultEntry {
    pub fn method(&self) -> &str {
        match self {
            Self::Spf(_) => SpfResult::METHOD,
            Self::Dkim(_) => DkimResult::METHOD,
            Self::SenderId(_) => SenderIdResult::METHOD,
            Self::DomainKeys(_) => DomainKeysResult::METHOD,
            Self::Auth(_) => AuthResult::METHOD,
            Self::Generic(r) => &r.method,
        }
    }

    pub fn value(&self) -> &ResultValue {
        match self {
            Self::Spf(r) => &r.value,
            Self::Dkim(r) => &r.value,
            Self::SenderId(r) => &r.value,
            Self::DomainKeys(r) => &r.value,
            Self::Auth(r) => &r.value,
            Self::Generic(r) => &r.value,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Spf(r) => r.reason(),
            Self::Dkim(r) => r.reason(),
            Self::SenderId(r) => r.reason(),
            Self::DomainKeys(r) => r.reason(),
            Self::Auth(r) => r.reason(),
            Self::Generic(r) => r.reason.as_deref(),
        }
    }

    /// Picks the typed variant for `raw.method`
    pub fn from_raw(raw: RawResult) -> Self {
        let method = raw.method.as_str();
        if method.eq_ignore_ascii_case(SpfResult::METHOD) {
            Self::Spf(SpfResult::from_raw(raw))
        } else if method.eq_ignore_ascii_case(DkimResult::METHOD) {
            Self::Dkim(DkimResult::from_raw(raw))
        } else if method.eq_ignore_ascii_case(SenderIdResult::METHOD) {
            Self::SenderId(SenderIdResult::from_raw(raw))
        } else if method.eq_ignore_ascii_case(DomainKeysResult::METHOD) {
            Self::DomainKeys(DomainKeysResult::from_raw(raw))
        } else if method.eq_ignore_ascii_case(AuthResult::METHOD) {
            Self::Auth(AuthResult::from_raw(raw))
        } else {
            Self::Generic(GenericResult::from(raw))
        }
    }

    pub fn to_raw(&self) -> RawResult {
        match self {
            Self::Spf(r) => r.to_raw(),
            Self::Dkim(r) => r.to_raw(),
            Self::SenderId(r) => r.to_raw(),
            Self::DomainKeys(r) => r.to_raw(),
            Self::Auth(r) => r.to_raw(),
            Self::Generic(r) => RawResult {
                method: r.method.clone(),
                value: r.value.to_string(),
                reason: r.reason.clone(),
                properties: r.properties.clone(),
            },
        }
    }
}

impl From<RawResult> for ResultEntry {
    fn from(raw: RawResult) -> Self {
        Self::from_raw(raw)
    }
}

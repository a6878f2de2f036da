//! Menu model and its wire format.
//!
//! A menu is an ordered list of directory entities. Each entity is written on
//! its own line as the item type character followed by the tab-separated
//! name, selector, host and port.

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

const FIELD_SEPARATOR: char = '\t';

/// Kind of resource a menu line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// A text document.
    Document,
    /// Another menu.
    Directory,
    /// Informational text that is not selectable.
    Info,
}

impl ItemType {
    /// Wire character for the item type.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Document => '0',
            Self::Directory => '1',
            Self::Info => 'i',
        }
    }

    /// Parses a wire character.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Self::Document),
            '1' => Some(Self::Directory),
            'i' => Some(Self::Info),
            _ => None,
        }
    }
}

/// One line of a menu.
///
/// Tabs and line breaks in the textual fields are replaced with spaces on
/// construction, so a serialised entity always occupies exactly one line with
/// exactly five fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntity {
    item_type: ItemType,
    name: String,
    selector: String,
    host: String,
    port: u16,
}

impl DirEntity {
    /// Builds an entity, sanitising the textual fields.
    #[must_use]
    pub fn new(
        item_type: ItemType,
        name: impl AsRef<str>,
        selector: impl AsRef<str>,
        host: impl AsRef<str>,
        port: u16,
    ) -> Self {
        Self {
            item_type,
            name: sanitise(name.as_ref()),
            selector: sanitise(selector.as_ref()),
            host: sanitise(host.as_ref()),
            port,
        }
    }

    /// Item type of the entity.
    #[must_use]
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Selector the client sends back to follow the entity.
    #[must_use]
    pub fn selector(&self) -> &str {
        self.selector.as_str()
    }

    /// Host serving the selector.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Port serving the selector.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Parses a single menu line, with or without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`MenuLineError`] when the line is empty, has an unknown item
    /// type, does not carry exactly four tab-separated fields after the type,
    /// or has a port that is not a `u16`.
    pub fn parse_line(line: &str) -> Result<Self, MenuLineError> {
        let line = line
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(line);
        let mut chars = line.chars();
        let type_char = chars.next().ok_or(MenuLineError::Empty)?;
        let item_type =
            ItemType::from_char(type_char).ok_or(MenuLineError::UnknownType(type_char))?;
        let fields: Vec<&str> = chars.as_str().split(FIELD_SEPARATOR).collect();
        let [name, selector, host, port] = fields.as_slice() else {
            return Err(MenuLineError::FieldCount(fields.len()));
        };
        let port = port
            .parse()
            .map_err(|_| MenuLineError::InvalidPort((*port).to_owned()))?;
        Ok(Self {
            item_type,
            name: (*name).to_owned(),
            selector: (*selector).to_owned(),
            host: (*host).to_owned(),
            port,
        })
    }
}

impl fmt::Display for DirEntity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}{}\t{}\t{}\t{}",
            self.item_type.as_char(),
            self.name,
            self.selector,
            self.host,
            self.port
        )
    }
}

fn sanitise(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ")
}

/// Errors raised while parsing a menu line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MenuLineError {
    /// The line was empty.
    #[error("empty menu line")]
    Empty,
    /// The leading item type character is not recognised.
    #[error("unknown item type '{0}'")]
    UnknownType(char),
    /// The line did not carry name, selector, host and port.
    #[error("expected 4 tab-separated fields, found {0}")]
    FieldCount(usize),
    /// The port field is not a valid port number.
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

/// Ordered list of entities; order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    entities: Vec<DirEntity>,
}

impl Menu {
    /// Builds a menu from entities in display order.
    #[must_use]
    pub fn new(entities: Vec<DirEntity>) -> Self {
        Self { entities }
    }

    /// Entities in display order.
    #[must_use]
    pub fn entities(&self) -> &[DirEntity] {
        &self.entities
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the menu has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Writes every entity to `sink`, one line each.
    ///
    /// Lines are written one at a time, so the sink decides how much is
    /// buffered.
    ///
    /// # Errors
    ///
    /// Propagates the first write error from `sink`.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        for entity in &self.entities {
            writeln!(sink, "{entity}")?;
        }
        Ok(())
    }
}

impl FromIterator<DirEntity> for Menu {
    fn from_iter<I: IntoIterator<Item = DirEntity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/girr.rs - Girr XML writer for remote sets.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `girr` Module
 *
 * Writes a [`RemoteSet`] as a Girr ("General IR Remote") 1.2 document.
 * Commands are written in parameter form only; no raw timings are generated.
 *
 * The document is rendered completely in memory before anything is written,
 * so a failing conversion never leaves a truncated file behind.
 */

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};
use crate::model::{Command, CommandSet, Remote, RemoteSet};

pub const GIRR_NAMESPACE: &str = "http://www.harctoolbox.org/Girr";
pub const GIRR_VERSION: &str = "1.2";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://www.harctoolbox.org/Girr http://www.harctoolbox.org/schemas/girr_ns-1.2.xsd";

/// Character sets the output can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    UsAscii,
    Latin1,
    Utf8,
}

impl Charset {
    /// The name written into the XML declaration.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::UsAscii => "US-ASCII",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Utf8 => "UTF-8",
        }
    }

    fn max_char(&self) -> u32 {
        match self {
            Charset::UsAscii => 0x7F,
            Charset::Latin1 => 0xFF,
            Charset::Utf8 => u32::from(char::MAX),
        }
    }

    /// Encodes serialized XML, replacing unrepresentable characters with
    /// numeric character references.
    pub fn encode(&self, xml: &str) -> Vec<u8> {
        if *self == Charset::Utf8 {
            return xml.as_bytes().to_vec();
        }

        let max = self.max_char();
        let mut out = Vec::with_capacity(xml.len());
        for c in xml.chars() {
            let code = u32::from(c);
            if code > max {
                out.extend_from_slice(format!("&#{};", code).as_bytes());
            } else {
                // Fits in a single byte for both ASCII and Latin-1.
                out.push(code as u8);
            }
        }
        out
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "US-ASCII" | "ASCII" | "US" | "ANSI-X3.4-1968" => Ok(Charset::UsAscii),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Ok(Charset::Latin1),
            "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            _ => Err(Error::Encoding(format!("Unsupported character set {:?}", s))),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type XmlWriter = Writer<Vec<u8>>;

fn start<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for &attribute in attributes {
        element.push_attribute(attribute);
    }
    element
}

fn write_command(writer: &mut XmlWriter, command: &Command) -> Result<()> {
    writer.write_event(Event::Start(start(
        "command",
        &[("name", command.name.as_str())],
    )))?;
    writer.write_event(Event::Start(start(
        "parameters",
        &[("protocol", command.protocol.as_str())],
    )))?;
    for (name, value) in &command.parameters {
        let value = value.to_string();
        writer.write_event(Event::Empty(start(
            "parameter",
            &[("name", name.as_str()), ("value", value.as_str())],
        )))?;
    }
    writer.write_event(Event::End(BytesEnd::new("parameters")))?;
    writer.write_event(Event::End(BytesEnd::new("command")))?;
    Ok(())
}

fn write_command_set(writer: &mut XmlWriter, command_set: &CommandSet) -> Result<()> {
    writer.write_event(Event::Start(start(
        "commandSet",
        &[("name", command_set.name.as_str())],
    )))?;
    for (language, text) in &command_set.notes {
        writer.write_event(Event::Start(start(
            "notes",
            &[("xml:lang", language.as_str())],
        )))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("notes")))?;
    }
    for command in command_set.commands.values() {
        write_command(writer, command)?;
    }
    writer.write_event(Event::End(BytesEnd::new("commandSet")))?;
    Ok(())
}

fn write_remote(writer: &mut XmlWriter, remote: &Remote) -> Result<()> {
    writer.write_event(Event::Start(start(
        "remote",
        &[("name", remote.name.as_str())],
    )))?;
    for command_set in &remote.command_sets {
        write_command_set(writer, command_set)?;
    }
    writer.write_event(Event::End(BytesEnd::new("remote")))?;
    Ok(())
}

/// Renders `remote_set` as a Girr document in `charset`.
pub fn serialize(remote_set: &RemoteSet, title: &str, charset: Charset) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some(charset.name()),
        None,
    )))?;
    writer.write_event(Event::Start(start(
        "remotes",
        &[
            ("xmlns", GIRR_NAMESPACE),
            ("xmlns:xsi", XSI_NAMESPACE),
            ("girrVersion", GIRR_VERSION),
            ("title", title),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
        ],
    )))?;

    let admin = &remote_set.admin_data;
    writer.write_event(Event::Start(BytesStart::new("adminData")))?;
    writer.write_event(Event::Empty(start(
        "creationData",
        &[
            ("creatingUser", admin.creating_user.as_str()),
            ("source", admin.source.as_str()),
            ("creationDate", admin.creation_date.as_str()),
            ("tool", admin.tool.as_str()),
            ("toolVersion", admin.tool_version.as_str()),
        ],
    )))?;
    writer.write_event(Event::End(BytesEnd::new("adminData")))?;

    for remote in remote_set.remotes.values() {
        write_remote(&mut writer, remote)?;
    }
    writer.write_event(Event::End(BytesEnd::new("remotes")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Encoding(e.to_string()))?;
    xml.push('\n');
    Ok(charset.encode(&xml))
}

/// Renders `remote_set` and writes it to `sink`.
pub fn write<W: Write>(
    remote_set: &RemoteSet,
    title: &str,
    mut sink: W,
    charset: Charset,
) -> Result<()> {
    let bytes = serialize(remote_set, title, charset)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}

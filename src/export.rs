// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/export.rs - Flat CSV listing of remote sets.
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

use std::io::Write;

use crate::error::Result;
use crate::model::{Command, RemoteSet};

const HEADER: [&str; 5] = ["remote", "command_set", "command", "protocol", "parameters"];

fn format_parameters(command: &Command) -> String {
    command
        .parameters
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes one CSV record per command, in document order.
pub fn write_csv<W: Write>(remote_set: &RemoteSet, sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(sink);

    writer.write_record(HEADER)?;
    for (remote, command_set, command) in remote_set.commands() {
        writer.write_record([
            remote.name.as_str(),
            command_set.name.as_str(),
            command.name.as_str(),
            command.protocol.as_str(),
            format_parameters(command).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

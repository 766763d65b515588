// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/model.rs - Remote control data model.
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
 * # `model` Module
 *
 * The hierarchical remote definition produced by a conversion:
 *
 * ```text
 * RemoteSet ─┬─ AdminData
 *            └─ Remote (by name) ── CommandSet (in order) ── Command (by name)
 * ```
 *
 * Every map is an [`IndexMap`], so iteration follows insertion order and the
 * serialized output is stable across runs on the same input.
 */

use indexmap::IndexMap;

/// Language tag used for notes taken from the spreadsheet.
pub const ENGLISH: &str = "en";

/// One named button, with its decoded protocol and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The normalized command name.
    pub name: String,
    /// The protocol identifier reported by the decoder.
    pub protocol: String,
    /// Protocol parameters, in the order the decoder reported them.
    pub parameters: IndexMap<String, i64>,
}

/// The commands extracted from a single device page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    /// The device number of the page the commands came from.
    pub name: String,
    /// Descriptive notes keyed by language tag.
    pub notes: IndexMap<String, String>,
    /// Commands keyed by name.
    pub commands: IndexMap<String, Command>,
}

impl CommandSet {
    /// Creates an empty command set.
    ///
    /// # Arguments
    ///
    /// * `name` - The device number of the page the commands come from.
    ///
    /// # Returns
    ///
    /// A command set with no notes and no commands.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: IndexMap::new(),
            commands: IndexMap::new(),
        }
    }

    /// Adds `command`, replacing any earlier command with the same name.
    ///
    /// The replacement keeps the position of the first command with that name.
    /// Returns the replaced command, if there was one.
    pub fn insert_command(&mut self, command: Command) -> Option<Command> {
        self.commands.insert(command.name.clone(), command)
    }

    /// Attaches a note, unless `text` is empty.
    pub fn add_note(&mut self, language: &str, text: &str) {
        if !text.is_empty() {
            self.notes.insert(language.to_string(), text.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// All command sets belonging to one named device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// The device name from the index page.
    pub name: String,
    /// Never empty.
    pub command_sets: Vec<CommandSet>,
}

/// Provenance of a [`RemoteSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminData {
    /// The user who ran the conversion.
    pub creating_user: String,
    /// Path of the spreadsheet the remotes were read from.
    pub source: String,
    /// Local time of the conversion.
    pub creation_date: String,
    /// Name of the converting program.
    pub tool: String,
    /// Version of the converting program.
    pub tool_version: String,
}

/// The root of a converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSet {
    pub admin_data: AdminData,
    /// Remotes keyed by name, in order of first appearance on the index page.
    pub remotes: IndexMap<String, Remote>,
}

impl RemoteSet {
    /// Iterates over every command with the remote and command set it belongs to.
    pub fn commands(&self) -> impl Iterator<Item = (&Remote, &CommandSet, &Command)> {
        self.remotes.values().flat_map(|remote| {
            remote.command_sets.iter().flat_map(move |command_set| {
                command_set
                    .commands
                    .values()
                    .map(move |command| (remote, command_set, command))
            })
        })
    }

    pub fn command_count(&self) -> usize {
        self.commands().count()
    }
}

/// Groups command sets into remotes by device name.
#[derive(Debug, Default)]
pub struct RemoteSetBuilder {
    groups: IndexMap<String, Vec<CommandSet>>,
}

impl RemoteSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `command_set` to the remote called `remote_name`, creating the
    /// remote on first use. Empty command sets are dropped; returns whether
    /// the set was attached.
    pub fn add(&mut self, remote_name: &str, command_set: CommandSet) -> bool {
        if command_set.is_empty() {
            return false;
        }
        self.groups
            .entry(remote_name.to_string())
            .or_insert_with(Vec::new)
            .push(command_set);
        true
    }

    pub fn build(self, admin_data: AdminData) -> RemoteSet {
        let remotes = self
            .groups
            .into_iter()
            .map(|(name, command_sets)| {
                let remote = Remote {
                    name: name.clone(),
                    command_sets,
                };
                (name, remote)
            })
            .collect();

        RemoteSet {
            admin_data,
            remotes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str, function: i64) -> Command {
        let mut parameters = IndexMap::new();
        parameters.insert("D".to_string(), 1);
        parameters.insert("F".to_string(), function);
        Command {
            name: name.to_string(),
            protocol: "Sony12".to_string(),
            parameters,
        }
    }

    fn admin() -> AdminData {
        AdminData {
            creating_user: "tester".to_string(),
            source: "codes.fods".to_string(),
            creation_date: "2026-01-01_00:00:00".to_string(),
            tool: "irsheet".to_string(),
            tool_version: "0.1.0".to_string(),
        }
    }

    fn command_set(name: &str) -> CommandSet {
        let mut set = CommandSet::new(name);
        set.insert_command(command("Power", 21));
        set
    }

    #[test]
    fn later_command_replaces_earlier_in_place() {
        let mut set = CommandSet::new("1");
        assert!(set.insert_command(command("Power", 21)).is_none());
        set.insert_command(command("Mute", 20));
        let replaced = set.insert_command(command("Power", 47)).unwrap();

        assert_eq!(replaced.parameters["F"], 21);
        assert_eq!(set.commands.len(), 2);
        let (first_name, first) = set.commands.first().unwrap();
        assert_eq!(first_name, "Power");
        assert_eq!(first.parameters["F"], 47);
    }

    #[test]
    fn empty_notes_are_not_stored() {
        let mut set = CommandSet::new("1");
        set.add_note(ENGLISH, "");
        assert!(set.notes.is_empty());
        set.add_note(ENGLISH, "basic set");
        assert_eq!(set.notes[ENGLISH], "basic set");
    }

    #[test]
    fn builder_groups_by_name_in_first_seen_order() {
        let mut builder = RemoteSetBuilder::new();
        assert!(builder.add("TV", command_set("1")));
        assert!(builder.add("VCR", command_set("2")));
        assert!(builder.add("TV", command_set("3")));
        let set = builder.build(admin());

        let names: Vec<_> = set.remotes.keys().cloned().collect();
        assert_eq!(names, ["TV", "VCR"]);
        let tv: Vec<_> = set.remotes["TV"]
            .command_sets
            .iter()
            .map(|cs| cs.name.as_str())
            .collect();
        assert_eq!(tv, ["1", "3"]);
        assert_eq!(set.command_count(), 3);
    }

    #[test]
    fn builder_drops_empty_command_sets() {
        let mut builder = RemoteSetBuilder::new();
        assert!(!builder.add("TV", CommandSet::new("1")));
        let set = builder.build(admin());
        assert!(set.remotes.is_empty());
    }
}

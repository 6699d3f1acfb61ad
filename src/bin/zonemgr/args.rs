// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implements command-line argument parsing.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Parses the command line arguments.
pub fn parse() -> Args {
    Args::parse()
}

/// Role-scoped management of DNS records
#[derive(Debug, Parser)]
#[command(author, version)]
pub struct Args {
    /// Set the configuration file to use
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set the database file to use
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the database and the admin role
    Init,

    /// Manage records
    #[command(subcommand)]
    Record(RecordCommand),

    /// Manage roles (admin only)
    #[command(subcommand)]
    Role(RoleCommand),
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Create a record from a JSON body
    Create(RecordBodyArgs),
    /// Update a record from a JSON body
    Update(RecordBodyArgs),
    /// Print a record
    Get(RecordRefArgs),
    /// Delete a record
    Delete(RecordRefArgs),
    /// Print every record the role may access
    List(ActorArgs),
}

#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Create a role from a JSON body
    Create(RoleBodyArgs),
    /// Replace a role with a JSON body
    Update(RoleBodyArgs),
    /// Print a role
    Get(RoleRefArgs),
    /// Delete a role
    Delete(RoleRefArgs),
    /// Print every role
    List(ActorArgs),
}

#[derive(Debug, ClapArgs)]
pub struct ActorArgs {
    /// Act as this role (defaults to the configured role)
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,
}

#[derive(Debug, ClapArgs)]
pub struct RecordBodyArgs {
    #[command(flatten)]
    pub actor: ActorArgs,

    /// The owner name of the record
    pub name: String,

    /// The record as a JSON object, e.g. '{"type":"A","host":"10.0.0.5"}'
    pub body: String,
}

#[derive(Debug, ClapArgs)]
pub struct RecordRefArgs {
    #[command(flatten)]
    pub actor: ActorArgs,

    /// The owner name of the record
    pub name: String,

    /// The RR type of the record
    #[arg(value_name = "TYPE")]
    pub rr_type: String,
}

#[derive(Debug, ClapArgs)]
pub struct RoleBodyArgs {
    #[command(flatten)]
    pub actor: ActorArgs,

    /// The name of the role
    pub name: String,

    /// The role as a JSON object with description, allow, and deny
    pub body: String,
}

#[derive(Debug, ClapArgs)]
pub struct RoleRefArgs {
    #[command(flatten)]
    pub actor: ActorArgs,

    /// The name of the role
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_commands_parse() {
        let args = Args::try_parse_from([
            "zonemgr",
            "record",
            "create",
            "--role",
            "ops",
            "www.example.com",
            r#"{"type":"A","host":"10.0.0.5"}"#,
            "--database",
            "test.sqlite3",
        ])
        .unwrap();
        assert_eq!(args.database, Some(PathBuf::from("test.sqlite3")));
        match args.command {
            Command::Record(RecordCommand::Create(create)) => {
                assert_eq!(create.actor.role.as_deref(), Some("ops"));
                assert_eq!(create.name, "www.example.com");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn clap_configuration_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}

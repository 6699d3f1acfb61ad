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

//! Implements the commands.

use std::fmt::Write;
use std::process;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info};
use serde::Serialize;
use serde_json::Value;

use zonemgr::records::Records;
use zonemgr::roles::{self, Roles};
use zonemgr::store::SqliteStore;

use crate::args::{Args, Command, RecordCommand, RoleCommand};
use crate::config::{self, Settings};

/// Runs the command given on the command line.
pub fn run(args: Args) {
    env_logger::init_from_env(Env::new().default_filter_or("warn"));

    if let Err(e) = try_running(args) {
        let mut message = String::from("Failed:");
        for (i, cause) in e.chain().enumerate() {
            write!(message, "\n[{}] {}", i + 1, cause).unwrap();
        }
        error!("{}", message);
        process::exit(1);
    }
}

fn try_running(args: Args) -> Result<()> {
    let config = match args.config {
        Some(ref config_path) => {
            info!("Loading the configuration from {}.", config_path.display());
            Some(config::load_from_path(config_path).context("failed to load the configuration")?)
        }
        None => None,
    };
    let settings = config::resolve(config, args.database);
    let store = SqliteStore::open(&settings.database).with_context(|| {
        format!(
            "failed to open the database {}",
            settings.database.display()
        )
    })?;

    match args.command {
        Command::Init => {
            if roles::bootstrap(&store).context("failed to initialize the database")? {
                println!("Created the '{}' role.", roles::ADMIN_ROLE);
            } else {
                println!("The database is already initialized.");
            }
            Ok(())
        }
        Command::Record(command) => run_record_command(&settings, &store, command),
        Command::Role(command) => run_role_command(&settings, &store, command),
    }
}

fn run_record_command(
    settings: &Settings,
    store: &SqliteStore,
    command: RecordCommand,
) -> Result<()> {
    let records = Records::new(store);
    match command {
        RecordCommand::Create(args) => {
            let role = settings.actor(args.actor.role)?;
            let body = parse_body(&args.body)?;
            records
                .create(&role, &args.name, &body)
                .context("failed to create the record")
        }
        RecordCommand::Update(args) => {
            let role = settings.actor(args.actor.role)?;
            let body = parse_body(&args.body)?;
            records
                .update(&role, &args.name, &body)
                .context("failed to update the record")
        }
        RecordCommand::Get(args) => {
            let role = settings.actor(args.actor.role)?;
            let record = records
                .get(&role, &args.name, &args.rr_type)
                .context("failed to get the record")?;
            print_json(&record)
        }
        RecordCommand::Delete(args) => {
            let role = settings.actor(args.actor.role)?;
            records
                .delete(&role, &args.name, &args.rr_type)
                .context("failed to delete the record")
        }
        RecordCommand::List(args) => {
            let role = settings.actor(args.role)?;
            let list = records.list(&role).context("failed to list records")?;
            print_json(&list)
        }
    }
}

fn run_role_command(settings: &Settings, store: &SqliteStore, command: RoleCommand) -> Result<()> {
    let roles = Roles::new(store);
    match command {
        RoleCommand::Create(args) => {
            let actor = settings.actor(args.actor.role)?;
            let body = parse_body(&args.body)?;
            roles
                .create(&actor, &args.name, &body)
                .context("failed to create the role")
        }
        RoleCommand::Update(args) => {
            let actor = settings.actor(args.actor.role)?;
            let body = parse_body(&args.body)?;
            roles
                .update(&actor, &args.name, &body)
                .context("failed to update the role")
        }
        RoleCommand::Get(args) => {
            let actor = settings.actor(args.actor.role)?;
            let role = roles
                .get(&actor, &args.name)
                .context("failed to get the role")?;
            print_json(&role)
        }
        RoleCommand::Delete(args) => {
            let actor = settings.actor(args.actor.role)?;
            roles
                .delete(&actor, &args.name)
                .context("failed to delete the role")
        }
        RoleCommand::List(args) => {
            let actor = settings.actor(args.role)?;
            let list = roles.list(&actor).context("failed to list roles")?;
            print_json(&list)
        }
    }
}

fn parse_body(text: &str) -> Result<Value> {
    serde_json::from_str(text).context("failed to parse the JSON body")
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize the output")?;
    println!("{}", text);
    Ok(())
}

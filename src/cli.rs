// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn amount_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("amount")
            .long("amount")
            .required(true)
            .help("Quantity of the asset"),
    )
    .arg(
        Arg::new("price")
            .long("price")
            .default_value("0")
            .help("USD price per unit (0 = derive from total)"),
    )
    .arg(
        Arg::new("total")
            .long("total")
            .default_value("0")
            .help("USD total (0 = derive from price)"),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .required(true)
            .help("YYYY-MM-DDTHH:MM"),
    )
    .arg(Arg::new("note").long("note").help("Free-text note"))
}

pub fn build_cli() -> Command {
    Command::new("cryptrack")
        .version(crate_version!())
        .about("Personal crypto portfolio tracker")
        .subcommand(Command::new("init").about("Create the data directory and database"))
        .subcommand(
            Command::new("user")
                .about("Accounts and sessions")
                .subcommand(
                    Command::new("register")
                        .arg(Arg::new("username").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("username").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami"))
                .subcommand(
                    Command::new("touch-id").arg(
                        Arg::new("state")
                            .required(true)
                            .value_parser(["on", "off"]),
                    ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and edit transactions")
                .subcommand(amount_args(
                    Command::new("add")
                        .arg(Arg::new("symbol").required(true).help("Ticker, e.g. BTC"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("buy")
                                .help("buy or sell"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("symbol")
                            .long("symbol")
                            .help("Only this ticker, newest first"),
                    ),
                ))
                .subcommand(amount_args(
                    Command::new("edit").arg(Arg::new("id").required(true)),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(Command::new("restore").arg(Arg::new("id").required(true)))
                .subcommand(json_flags(Command::new("trash"))),
        )
        .subcommand(json_flags(
            Command::new("portfolio")
                .about("Holdings per asset")
                .arg(
                    Arg::new("live")
                        .long("live")
                        .action(ArgAction::SetTrue)
                        .help("Value holdings with current market prices"),
                ),
        ))
        .subcommand(
            Command::new("market")
                .about("Market listings")
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(clap::value_parser!(usize)),
                    ),
                )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}

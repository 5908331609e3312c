//! Interactive session: one command per line on stdin, results printed as
//! fetches resolve.

use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use layer_controller::{Applied, LayerController};
use methane_common::{parse_date, Basemap, LayerKind, ParameterUpdate};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::report::{self, OutputFormat};

pub const HELP: &str = "\
Commands:
  layer <heatmap|plumes|prediction>   switch the active layer
  date <YYYY-MM-DD>                   select a date
  latest                              clear the date (latest available)
  threshold <1850-2000|up|down>       heatmap threshold in ppb, or one step
  basemap <satellite|roadmap>         switch the reference tiles
  factories <load|on|off>             factory overlay (heatmap only)
  retry                               re-issue the current request
  view                                print the current view
  help                                show this text
  quit                                leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoriesAction {
    Load,
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdStep {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Layer(LayerKind),
    Date(NaiveDate),
    Latest,
    Threshold(u16),
    StepThreshold(ThresholdStep),
    Basemap(Basemap),
    Factories(FactoriesAction),
    Retry,
    View,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let command = words
            .next()
            .ok_or_else(|| anyhow!("empty command"))?
            .to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            bail!("too many arguments for '{}'", command);
        }

        let required = |what: &str| arg.ok_or_else(|| anyhow!("'{}' needs {}", command, what));

        let parsed = match command.as_str() {
            "layer" => SessionCommand::Layer(required("a layer name")?.parse()?),
            "date" => SessionCommand::Date(parse_date(required("a date")?)?),
            "latest" => SessionCommand::Latest,
            "threshold" => {
                let value = required("a value in ppb")?;
                match value.to_ascii_lowercase().as_str() {
                    "up" | "+" => SessionCommand::StepThreshold(ThresholdStep::Up),
                    "down" | "-" => SessionCommand::StepThreshold(ThresholdStep::Down),
                    _ => {
                        let ppb = value
                            .parse()
                            .map_err(|_| anyhow!("'{}' is not a threshold in ppb", value))?;
                        SessionCommand::Threshold(ppb)
                    }
                }
            }
            "basemap" => SessionCommand::Basemap(required("a basemap name")?.parse()?),
            "factories" => {
                let action = match required("load, on or off")?.to_ascii_lowercase().as_str() {
                    "load" => FactoriesAction::Load,
                    "on" | "show" => FactoriesAction::On,
                    "off" | "hide" => FactoriesAction::Off,
                    other => bail!("unknown factories action '{}'", other),
                };
                SessionCommand::Factories(action)
            }
            "retry" => SessionCommand::Retry,
            "view" => SessionCommand::View,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };

        let takes_arg = matches!(
            parsed,
            SessionCommand::Layer(_)
                | SessionCommand::Date(_)
                | SessionCommand::Threshold(_)
                | SessionCommand::StepThreshold(_)
                | SessionCommand::Basemap(_)
                | SessionCommand::Factories(_)
        );
        if !takes_arg && arg.is_some() {
            bail!("'{}' takes no arguments", command);
        }

        Ok(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the read-eval loop until `quit` or end of input.
///
/// Stdin and fetch resolutions are multiplexed, so results are printed as
/// soon as they arrive even while the user is typing.
pub async fn run(mut controller: LayerController, format: OutputFormat) -> Result<()> {
    println!("{}", HELP);
    controller.evaluate();
    print_status(&controller, format)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<SessionCommand>() {
                    Ok(command) => {
                        if execute(&mut controller, command, format)? == Flow::Quit {
                            break;
                        }
                    }
                    Err(err) => eprintln!("{}", err),
                }
            }
            Some(resolution) = controller.next_resolution() => {
                if controller.apply(resolution) == Applied::Committed {
                    println!("{}", report::render(&controller.view(), format)?);
                }
            }
        }
    }

    Ok(())
}

fn execute(
    controller: &mut LayerController,
    command: SessionCommand,
    format: OutputFormat,
) -> Result<Flow> {
    let update = match command {
        SessionCommand::Layer(layer) => ParameterUpdate::new().layer(layer),
        SessionCommand::Date(date) => ParameterUpdate::new().date(date),
        SessionCommand::Latest => ParameterUpdate::new().latest(),
        SessionCommand::Threshold(ppb) => ParameterUpdate::new().threshold(ppb),
        SessionCommand::StepThreshold(step) => {
            let stepped = controller.params().threshold.step(step == ThresholdStep::Up);
            ParameterUpdate::new().threshold(stepped.ppb())
        }
        SessionCommand::Basemap(basemap) => ParameterUpdate::new().basemap(basemap),
        SessionCommand::Factories(FactoriesAction::On) => ParameterUpdate::new().show_factories(true),
        SessionCommand::Factories(FactoriesAction::Off) => {
            ParameterUpdate::new().show_factories(false)
        }
        SessionCommand::Factories(FactoriesAction::Load) => {
            match controller.load_factories() {
                Ok(count) => println!("Loaded {} factories", count),
                Err(err) => warn!(error = %err, "Factory overlay unavailable"),
            }
            print_status(controller, format)?;
            return Ok(Flow::Continue);
        }
        SessionCommand::Retry => {
            controller.evaluate();
            print_status(controller, format)?;
            return Ok(Flow::Continue);
        }
        SessionCommand::View => {
            println!("{}", report::render(&controller.view(), format)?);
            return Ok(Flow::Continue);
        }
        SessionCommand::Help => {
            println!("{}", HELP);
            return Ok(Flow::Continue);
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
    };

    match controller.set_parameters(update) {
        Ok(changes) if !changes.any() => println!("Nothing changed"),
        Ok(_) => print_status(controller, format)?,
        Err(err) => eprintln!("{}", err),
    }
    Ok(Flow::Continue)
}

/// Print the view now, or a loading line if a fetch is still out.
fn print_status(controller: &LayerController, format: OutputFormat) -> Result<()> {
    if controller.request_state().loading {
        println!("Loading {}...", controller.params().active_layer);
    } else {
        println!("{}", report::render(&controller.view(), format)?);
    }
    Ok(())
}

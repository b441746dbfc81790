use anyhow::Context;
use inquire::{InquireError, Text};
use tracing::debug;
use weather_core::{SlotStore, WeatherApp, WeatherProvider};

/// One line of user input in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    Toggle,
    Remove,
    Quit,
    Nothing,
}

impl Action {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input {
            "" => Action::Nothing,
            ":toggle" | ":t" => Action::Toggle,
            ":remove" | ":r" => Action::Remove,
            ":quit" | ":q" => Action::Quit,
            city => Action::Search(city.to_string()),
        }
    }
}

/// Prompt loop: re-render after every action until the user quits.
pub async fn run<S, P>(mut app: WeatherApp<S>, provider: &P) -> anyhow::Result<()>
where
    S: SlotStore,
    P: WeatherProvider + ?Sized,
{
    println!("{}", app.render());

    loop {
        let line = match Text::new("City Name:")
            .with_help_message(":toggle switches units, :remove clears the card, :quit exits")
            .prompt()
        {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                debug!("prompt cancelled, leaving session");
                break;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        };

        let action = Action::parse(&line);
        debug!(?action, "session input");

        match action {
            Action::Search(city) => {
                app.search(provider, &city).await?;
            }
            Action::Toggle => {
                app.toggle_unit();
            }
            Action::Remove => app.remove()?,
            Action::Quit => break,
            Action::Nothing => continue,
        }

        println!("{}", app.render());
    }

    Ok(())
}

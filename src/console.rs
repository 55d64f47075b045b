//! Line-oriented terminal front end over a [`ContactListController`].

use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};

use crate::logic::form::TAGS;
use crate::logic::{ContactListController, Outcome, UiAction};
use crate::model::Id;
use crate::store::ContactStore;

const HELP: &str = "\
Commands:
    list              show every contact
    search <prefix>   show contacts whose name starts with <prefix>
    tag <name>        show contacts tagged <name>
    add               create a contact
    edit <id>         edit a contact
    delete <id>       delete a contact
    help              show this help
    quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Search(String),
    Tag(String),
    Add,
    Edit(Id),
    Delete(Id),
    Help,
    Quit,
}

fn parse_id(verb: &str, arg: &str) -> Result<Id, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("Usage: {} <id> (got '{}')", verb, arg.trim()))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (verb, arg) = line.split_once(' ').unwrap_or((line, ""));
        match verb.to_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            // An empty search shows everything
            "search" => Ok(Command::Search(arg.to_string())),
            "tag" if !arg.trim().is_empty() => Ok(Command::Tag(arg.trim().to_string())),
            "tag" => Err("Usage: tag <name>".to_string()),
            "add" | "new" => Ok(Command::Add),
            "edit" => parse_id("edit", arg).map(Command::Edit),
            "delete" | "rm" => parse_id("delete", arg).map(Command::Delete),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(format!("Unknown command: {} (try `help`)", verb)),
        }
    }
}

pub struct Console<S: ContactStore, R, W> {
    controller: ContactListController<S>,
    input: Lines<BufReader<R>>,
    output: W,
    confirm_deletes: bool,
}

impl<S, R, W> Console<S, R, W>
where
    S: ContactStore,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(controller: ContactListController<S>, input: R, output: W, confirm_deletes: bool) -> Self {
        Self {
            controller,
            input: BufReader::new(input).lines(),
            output,
            confirm_deletes,
        }
    }

    pub fn controller(&self) -> &ContactListController<S> {
        &self.controller
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Load the contacts and serve commands until `quit` or end of input
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.controller.initialize().await;
        self.print_container().await?;

        loop {
            self.write("> ").await?;
            let Some(line) = self.input.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(message) => self.writeln(&message).await?,
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::List => {
                self.controller.show_all();
                self.print_container().await
            }
            Command::Search(query) => {
                self.controller.search(&query);
                self.print_container().await
            }
            Command::Tag(tag) => {
                self.controller
                    .dispatch(UiAction::FilterByTag(tag), |_| false)
                    .await;
                self.print_container().await
            }
            Command::Add => {
                let outcome = self
                    .controller
                    .dispatch(UiAction::OpenCreateForm, |_| false)
                    .await;
                if outcome == Outcome::Rejected {
                    return self.writeln("Another form is already open.").await;
                }
                self.fill_and_submit().await
            }
            Command::Edit(id) => {
                match self.controller.dispatch(UiAction::Edit(id), |_| false).await {
                    Outcome::Rejected => {
                        return self.writeln("Another form is already open.").await;
                    }
                    Outcome::Failed => {
                        self.writeln(&format!("Could not load contact {}.", id))
                            .await?;
                    }
                    _ => {}
                }
                self.fill_and_submit().await
            }
            Command::Delete(id) => {
                let confirmed = if self.confirm_deletes {
                    self.ask(&format!("{} [y/N] ", crate::logic::DELETE_PROMPT))
                        .await?
                        .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
                        .unwrap_or(false)
                } else {
                    true
                };
                match self
                    .controller
                    .dispatch(UiAction::Delete(id), |_| confirmed)
                    .await
                {
                    Outcome::Applied => self.print_container().await,
                    Outcome::Declined => self.writeln("Kept.").await,
                    _ => self.writeln(&format!("Could not delete contact {}.", id)).await,
                }
            }
            Command::Help => self.writeln(HELP).await,
            Command::Quit => Ok(()),
        }
    }

    /// Prompt for every field of the open form, then submit it.
    /// An empty answer keeps the value shown in brackets.
    async fn fill_and_submit(&mut self) -> anyhow::Result<()> {
        let Some(view) = self.controller.form_view() else {
            return Ok(());
        };
        self.writeln(view.title).await?;

        for (name, current) in view.fields {
            let label = if name == TAGS {
                "tags (space separated)"
            } else {
                name
            };
            let Some(answer) = self.ask(&format!("{} [{}]: ", label, current)).await? else {
                self.controller.cancel_form();
                return Ok(());
            };
            let answer = answer.trim();
            if !answer.is_empty() {
                if let Some(state) = self.controller.form_state_mut() {
                    state.set(name, answer);
                }
            }
        }

        match self.controller.submit_form().await {
            Outcome::Applied => {
                self.writeln("Saved.").await?;
                self.print_container().await
            }
            _ => {
                self.controller.cancel_form();
                self.writeln("The contacts API did not accept the request.")
                    .await
            }
        }
    }

    async fn ask(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.write(prompt).await?;
        Ok(self.input.next_line().await?)
    }

    async fn print_container(&mut self) -> anyhow::Result<()> {
        let text = self.controller.container().to_string();
        self.writeln(&text).await
    }

    async fn write(&mut self, text: &str) -> anyhow::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn writeln(&mut self, text: &str) -> anyhow::Result<()> {
        self.write(text).await?;
        self.write("\n").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, ContactFields};
    use crate::store::MemoryContactStore;
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!("list".parse::<Command>(), Ok(Command::List));
        assert_eq!(
            "search Al".parse::<Command>(),
            Ok(Command::Search("Al".to_string()))
        );
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
        assert_eq!("tag vip".parse::<Command>(), Ok(Command::Tag("vip".to_string())));
        assert_eq!("EDIT 4".parse::<Command>(), Ok(Command::Edit(4)));
        assert_eq!("delete 12".parse::<Command>(), Ok(Command::Delete(12)));
        assert!("delete x".parse::<Command>().is_err());
        assert!("tag".parse::<Command>().is_err());
        assert!("frobnicate".parse::<Command>().is_err());
    }

    async fn run_session(store: MemoryContactStore, script: &str) -> (String, Vec<Contact>) {
        let store = Arc::new(store);
        let controller = ContactListController::new(store.clone());
        let mut console = Console::new(controller, script.as_bytes(), Vec::new(), true);
        console.run().await.unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        (output, store.snapshot().await)
    }

    #[tokio::test]
    async fn test_add_then_filter_by_tag() {
        let script = "add\nAnn\na@x.com\n555\nvip\ntag vip\nquit\n";
        let (output, stored) = run_session(MemoryContactStore::new(), script).await;

        assert!(output.contains("There are no contacts"));
        assert!(output.contains("Create Contact"));
        assert!(output.contains("Saved."));
        assert!(output.contains("[1] Ann"));
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].tags, vec!["vip"]);
    }

    #[tokio::test]
    async fn test_delete_asks_before_removing() {
        let seed = Contact::from_fields(
            3,
            &ContactFields {
                full_name: "Cy".to_string(),
                ..Default::default()
            },
        );
        let store = MemoryContactStore::with_contacts(vec![seed]);

        let (output, stored) = run_session(store.clone(), "delete 3\nn\n").await;
        assert!(output.contains("Do you want to delete the contact?"));
        assert!(output.contains("Kept."));
        assert_eq!(stored.len(), 1);

        let (output, stored) = run_session(store, "delete 3\ny\n").await;
        assert!(output.contains("There are no contacts"));
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_unanswered_fields() {
        let seed = Contact::from_fields(
            5,
            &ContactFields {
                full_name: "Dana".to_string(),
                email: "d@x.com".to_string(),
                phone_number: "1".to_string(),
                tags: vec!["work".to_string()],
            },
        );
        let store = MemoryContactStore::with_contacts(vec![seed]);

        let (output, stored) = run_session(store, "edit 5\n\n\n222\n\n").await;
        assert!(output.contains("Edit Contact"));
        assert!(output.contains("tags (space separated) [work]"));
        assert_eq!(stored[0].phone_number, "222");
        assert_eq!(stored[0].full_name, "Dana");
        assert_eq!(stored[0].tags, vec!["work"]);
    }
}

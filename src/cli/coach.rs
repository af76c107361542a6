use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::ask::{LOADING, render};
use crate::client::{HelpClient, HelpForm, load_attachments};

const USAGE: &str = "Commands:
  :code PATH           load the code snippet from a file
  :image PATH|URL...   attach one or more images
  :rm INDEX            remove an attachment
  :show                show the current form
  :clear               clear code, question, and attachments
  :help                show this message
Anything else is sent as your question.";

fn show(form: &HelpForm) {
    println!("Code: {} line(s)", form.code().lines().count());
    println!(
        "Question: {}",
        if form.ask().is_empty() { "(none)" } else { form.ask() }
    );
    for (idx, attachment) in form.attachments().iter().enumerate() {
        println!("  [{}] {}", idx, attachment.name);
    }
    if let Some(name) = form.latest_file_name() {
        println!("Selected: {}", name);
    }
}

async fn handle_command(form: &mut HelpForm, line: &str) -> Result<()> {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match cmd {
        ":code" => {
            let code = tokio::fs::read_to_string(rest).await?;
            form.set_code(&code);
            println!("Loaded {} line(s) from {}", code.lines().count(), rest);
        }
        ":image" => {
            let sources: Vec<String> = rest.split_whitespace().map(String::from).collect();
            form.add_attachments(load_attachments(&sources).await?);
            show(form);
        }
        ":rm" => {
            let index: usize = rest.parse()?;
            match form.remove_attachment(index) {
                Some(removed) => println!("Removed {}", removed.name),
                None => println!("No attachment at {}", index),
            }
        }
        ":show" => show(form),
        ":clear" => *form = HelpForm::new(),
        _ => println!("{}", USAGE),
    }

    Ok(())
}

pub async fn run(url: String) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let client = HelpClient::new(&url);
    let mut form = HelpForm::new();

    println!("{}\n", render(&form));
    println!("{}", USAGE);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    if let Err(err) = handle_command(&mut form, line).await {
                        println!("Error: {:#}", err);
                    }
                    continue;
                }

                form.set_ask(line);
                println!("{}", LOADING);
                form.submit(&client).await;
                println!("{}", render(&form));
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

use anyhow::Result;

use crate::client::{HelpClient, HelpForm, PLACEHOLDER, View, load_attachments};

pub const LOADING: &str = "Thinking...";

pub fn render(form: &HelpForm) -> &str {
    match form.view() {
        View::Loading => LOADING,
        View::Response(text) => text,
        View::Placeholder => PLACEHOLDER,
    }
}

pub async fn run(
    url: String,
    code_file: Option<String>,
    ask: Option<String>,
    images: Vec<String>,
) -> Result<()> {
    let mut form = HelpForm::new();

    if let Some(path) = code_file {
        let code = tokio::fs::read_to_string(&path).await?;
        form.set_code(&code);
    }
    if let Some(ask) = ask {
        form.set_ask(&ask);
    }
    form.add_attachments(load_attachments(&images).await?);

    let client = HelpClient::new(&url);
    eprintln!("{}", LOADING);
    form.submit(&client).await;

    println!("{}", render(&form));
    Ok(())
}

// UI layer: an interactive menu built on `dialoguer`. Each action calls
// into `UploadClient` and the screen is re-rendered from its state.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::api::StoryService;
use crate::config::Settings;
use crate::image::{RawFile, IMAGE_EXTENSIONS};
use crate::narration::save_narration;
use crate::state::{ClientState, UploadClient};

const MENU_CHOOSE: &str = "Choose image";
const MENU_PATH: &str = "Enter image path";
const MENU_GENERATE: &str = "Generate story";
const MENU_SAVE: &str = "Save narration";
const MENU_RESET: &str = "Reset";
const MENU_EXIT: &str = "Exit";

/// Main interactive menu. Runs until the user chooses "Exit".
///
/// The entries shown follow the client state: "Save narration" only once a
/// story is ready, "Reset" only when there is something to clear.
pub fn main_menu<S: StoryService>(mut client: UploadClient<S>, settings: &Settings) -> Result<()> {
    print_banner();
    loop {
        render(&client);

        let items = menu_items(&client);
        let selection = Select::new()
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact()?;

        match items[selection] {
            MENU_CHOOSE => {
                // Closing the dialog without a file leaves the state alone.
                if let Some(path) = pick_with_dialog(settings) {
                    client.select_image(read_file(path));
                }
            }
            MENU_PATH => {
                let path: String = Input::new().with_prompt("Image file path").interact_text()?;
                client.select_image(read_file(PathBuf::from(path.trim())));
            }
            MENU_GENERATE => generate(&mut client),
            MENU_SAVE => {
                if let Some(url) = client.narration_url() {
                    match save_narration(client.service(), url, &settings.download_dir) {
                        Ok(path) => println!("{} {}", "Saved to".green(), path.display()),
                        Err(e) => {
                            warn!(error = %format!("{e:#}"), "Saving narration failed");
                            println!("{}", "Could not save the narration.".red());
                        }
                    }
                }
            }
            MENU_RESET => client.reset(),
            MENU_EXIT => break,
            _ => {}
        }
    }
    Ok(())
}

fn menu_items<S: StoryService>(client: &UploadClient<S>) -> Vec<&'static str> {
    let mut items = vec![MENU_CHOOSE, MENU_PATH, MENU_GENERATE];
    if client.state() == ClientState::Result {
        items.push(MENU_SAVE);
    }
    if client.can_reset() {
        items.push(MENU_RESET);
    }
    items.push(MENU_EXIT);
    items
}

/// Run the upload behind a spinner. The request itself blocks; the spinner
/// ticks on its own thread.
fn generate<S: StoryService>(client: &mut UploadClient<S>) {
    if !client.can_submit() {
        // Lets the client set its "select an image first" message.
        client.submit();
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Creating Magic...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    client.submit();

    spinner.finish_and_clear();
}

fn pick_with_dialog(settings: &Settings) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Choose an image")
        .add_filter("Images", IMAGE_EXTENSIONS);
    if let Some(dir) = &settings.picker_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}

/// Read the chosen file. An unreadable file counts as no file at all.
fn read_file(path: PathBuf) -> Option<RawFile> {
    match RawFile::from_path(&path) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Could not read selected file");
            None
        }
    }
}

fn print_banner() {
    println!();
    println!("{}", "📸 StoryLens".magenta().bold());
    println!(
        "{}",
        "Transform your images into captivating stories with AI-powered narration".dark_grey()
    );
    println!("{}", "Supported formats: JPG, PNG, GIF, etc.".dark_grey());
}

fn render<S: StoryService>(client: &UploadClient<S>) {
    println!();
    match client.selected_image() {
        Some(image) => println!(
            "{} {} ({}, {})",
            "Image:".bold(),
            image.file_name(),
            image.media_type(),
            human_size(image.len())
        ),
        None => println!("{}", "📂 No image selected".dark_grey()),
    }

    if let Some(error) = client.error() {
        println!("{}", error.red().bold());
    }

    if let Some(story) = client.story() {
        println!();
        println!("{}", "📝 Your Story".blue().bold());
        println!("{story}");
    }

    if let Some(url) = client.narration_url() {
        println!();
        println!("{}", "🔊 Listen to Your Story".blue().bold());
        println!("{}", url.underlined());
    }
    println!();
}

fn human_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

//! Line-mode interactive menu.
//!
//! Reads choices from any `BufRead` and writes colored text to any
//! `Write`, so the same loop drives stdin/stdout and tests. End of input
//! is treated like choosing Exit.

use std::io::{BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use crate::library::{Book, Library, LibraryError, SearchField};

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Search,
    Display,
    Statistics,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::Remove),
            "3" => Some(MenuChoice::Search),
            "4" => Some(MenuChoice::Display),
            "5" => Some(MenuChoice::Statistics),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Interactive menu bound to a library and an input/output pair.
pub struct Menu<'a, R, W> {
    library: &'a mut Library,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(library: &'a mut Library, input: R, output: W) -> Self {
        Self {
            library,
            input,
            output,
        }
    }

    /// Run until the user exits or input ends. The library is saved on exit.
    pub fn run(&mut self) -> Result<()> {
        self.banner()?;

        loop {
            self.show_menu()?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let outcome = match MenuChoice::parse(&choice) {
                Some(MenuChoice::Add) => self.add_book(),
                Some(MenuChoice::Remove) => self.remove_book(),
                Some(MenuChoice::Search) => self.search(),
                Some(MenuChoice::Display) => self.display_all(),
                Some(MenuChoice::Statistics) => self.statistics(),
                Some(MenuChoice::Exit) => break,
                None => {
                    writeln!(self.output, "{}", "Invalid choice. Please try again.".red())?;
                    Ok(())
                }
            };

            match outcome {
                Ok(()) => {}
                Err(Interrupt::Eof) => break,
                Err(Interrupt::Fatal(e)) => return Err(e),
            }
        }

        self.library.save()?;
        writeln!(
            self.output,
            "\n{}",
            "Library saved to file. Goodbye!".green()
        )?;
        self.output.flush()?;

        Ok(())
    }

    fn banner(&mut self) -> Result<()> {
        let rule = "===================================";
        writeln!(self.output, "\n{}", rule.yellow())?;
        writeln!(self.output, "{}", "  Welcome to Personal Library Manager".yellow())?;
        writeln!(self.output, "{}", rule.yellow())?;
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "Menu".cyan())?;
        writeln!(self.output, "1. Add a book")?;
        writeln!(self.output, "2. Remove a book")?;
        writeln!(self.output, "3. Search for a book")?;
        writeln!(self.output, "4. Display all books")?;
        writeln!(self.output, "5. Display statistics")?;
        writeln!(self.output, "6. Exit")?;
        Ok(())
    }

    fn heading(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.output, "\n{}", format!("=== {title} ===").cyan())
    }

    /// Print `message` and read one line. `None` on end of input.
    fn prompt(&mut self, message: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn require(&mut self, message: &str) -> Step<String> {
        self.prompt(message)?.ok_or(Interrupt::Eof)
    }

    fn read_year(&mut self) -> Step<i32> {
        loop {
            let answer = self.require("Enter the publication year: ")?;
            match answer.trim().parse::<i32>() {
                Ok(year) => return Ok(year),
                Err(_) => writeln!(
                    self.output,
                    "{}",
                    "Please enter a valid year (number).".red()
                )?,
            }
        }
    }

    fn add_book(&mut self) -> Step {
        self.heading("Add a Book")?;
        let title = self.require("Enter the book title: ")?;
        let author = self.require("Enter the author: ")?;
        let year = self.read_year()?;
        let genre = self.require("Enter the genre: ")?;
        let read = self
            .require("Have you read this book? (yes/no): ")?
            .trim()
            .eq_ignore_ascii_case("yes");

        match self.library.add(Book::new(title, author, year, genre, read)) {
            Ok(()) => writeln!(self.output, "{}", "Book added successfully!".green())?,
            Err(e) => self.report(e)?,
        }
        Ok(())
    }

    fn remove_book(&mut self) -> Step {
        self.heading("Remove a Book")?;
        let title = self.require("Enter the title of the book to remove: ")?;

        match self.library.remove(&title) {
            Ok(_) => writeln!(self.output, "{}", "Book removed successfully!".green())?,
            Err(e) => self.report(e)?,
        }
        Ok(())
    }

    fn search(&mut self) -> Step {
        self.heading("Search for a Book")?;
        writeln!(self.output, "Search by:")?;
        writeln!(self.output, "1. Title")?;
        writeln!(self.output, "2. Author")?;

        let field = match self.require("Enter your choice: ")?.parse::<SearchField>() {
            Ok(field) => field,
            Err(_) => {
                writeln!(self.output, "{}", "Invalid choice.".red())?;
                return Ok(());
            }
        };

        let term = self.require(&format!("Enter the {field}: "))?;

        let found = self.library.search(field, &term).map(|books| numbered(&books));
        let lines = match found {
            Ok(lines) => lines,
            Err(e) => return Ok(self.report(e)?),
        };

        writeln!(self.output, "\n{}", "Matching Books:".yellow())?;
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn display_all(&mut self) -> Step {
        self.heading("Your Library")?;

        let books = self.library.list(None);
        if books.is_empty() {
            writeln!(self.output, "{}", "Library is empty!".yellow())?;
            return Ok(());
        }

        for line in numbered(&books) {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn statistics(&mut self) -> Step {
        self.heading("Library Statistics")?;

        let stats = self.library.statistics();
        writeln!(self.output, "Total books: {}", stats.total)?;
        writeln!(self.output, "Books read: {}", stats.read)?;
        writeln!(self.output, "Percentage read: {}", stats.percent_label())?;
        Ok(())
    }

    /// Print a failed operation. Storage failures are also logged.
    fn report(&mut self, error: LibraryError) -> std::io::Result<()> {
        if !error.is_user_error() {
            tracing::error!(error = %error, "Library operation failed");
        }
        writeln!(self.output, "{}", error.to_string().red())
    }
}

fn numbered(books: &[&Book]) -> Vec<String> {
    books
        .iter()
        .enumerate()
        .map(|(i, book)| format!("{}. {}", i + 1, book))
        .collect()
}

/// Why a menu action stopped early.
enum Interrupt {
    Eof,
    Fatal(anyhow::Error),
}

impl From<std::io::Error> for Interrupt {
    fn from(e: std::io::Error) -> Self {
        Interrupt::Fatal(e.into())
    }
}

type Step<T = ()> = std::result::Result<T, Interrupt>;

//! Numbered calculator menu.
//!
//! The loop owns all retry/UX: unreadable text is re-prompted in
//! [`prompt::Prompter`], and a calculation error from the core is printed
//! before returning to the menu. Only a closed or failing input stream ends
//! the session with an error.

pub mod prompt;
pub mod screens;

use colored::Colorize;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use bond_calc_core::BondCalcError;
use prompt::Prompter;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("input stream closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Calc(#[from] BondCalcError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    BondPriceAnnual,
    BondPriceSemiAnnual,
    MacaulayDuration,
    ModifiedDuration,
    PriceChangeDuration,
    AnalyticalConvexity,
    ApproximateConvexity,
    DurationConvexity,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 9] = [
        MenuOption::BondPriceAnnual,
        MenuOption::BondPriceSemiAnnual,
        MenuOption::MacaulayDuration,
        MenuOption::ModifiedDuration,
        MenuOption::PriceChangeDuration,
        MenuOption::AnalyticalConvexity,
        MenuOption::ApproximateConvexity,
        MenuOption::DurationConvexity,
        MenuOption::Exit,
    ];

    pub fn from_choice(choice: i64) -> Option<MenuOption> {
        usize::try_from(choice)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub fn title(self) -> &'static str {
        match self {
            MenuOption::BondPriceAnnual => "Bond Price (Annual)",
            MenuOption::BondPriceSemiAnnual => "Bond Price (Semi-Annual)",
            MenuOption::MacaulayDuration => "Macaulay Duration",
            MenuOption::ModifiedDuration => "Modified Duration",
            MenuOption::PriceChangeDuration => "Price Change (Duration)",
            MenuOption::AnalyticalConvexity => "Analytical Convexity",
            MenuOption::ApproximateConvexity => "Approximate Convexity",
            MenuOption::DurationConvexity => "Duration + Convexity",
            MenuOption::Exit => "Exit",
        }
    }
}

const BANNER: &str = "BOND CALCULATOR";

/// Run the menu until the user picks Exit.
pub fn run<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<(), MenuError> {
    loop {
        print_menu(p.out())?;
        let choice = p.integer("Select option (1-9): ", Some(1), Some(9))?;
        let Some(option) = MenuOption::from_choice(choice) else {
            continue;
        };
        tracing::debug!(option = option.title(), "menu selection");

        if option == MenuOption::Exit {
            writeln!(p.out(), "\nThank you for using the Bond Calculator!")?;
            return Ok(());
        }

        match screens::run(option, p) {
            Ok(()) => {}
            Err(MenuError::Calc(e)) => {
                tracing::warn!(option = option.title(), error = %e, "calculation rejected");
                writeln!(p.out(), "\nError: {}", e)?;
                p.pause()?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run against the process's stdin/stdout and map the outcome to an exit code.
pub fn run_stdio() -> i32 {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());

    match run(&mut prompter) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "menu session ended");
            eprintln!("\n{}: {}", "error".red().bold(), e);
            1
        }
    }
}

fn print_menu<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "\n{}", BANNER)?;
    writeln!(w, "{}", "=".repeat(BANNER.len()))?;
    for (idx, option) in MenuOption::ALL.iter().enumerate() {
        writeln!(w, "{}. {}", idx + 1, option.title())?;
    }
    writeln!(w, "{}", "=".repeat(BANNER.len()))
}

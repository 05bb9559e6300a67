use std::{
    io::{BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use clap::{Args, Subcommand, ValueEnum};
use log::{info, warn};

use crate::{
    error::{QuizError, Result},
    handlers::session_handler::QuizSession,
    models::{
        draft::{QuestionDraft, MIN_OPTION_COUNT},
        question::{Question, QuestionKind},
        score::Score,
    },
    repositories::{
        question_repository::{QuestionRepository, EXPORT_FILE_NAME},
        score_repository::ScoreRepository,
    },
    storage::Storage,
};

/// Both repositories over one shared store.
pub struct QuizApp {
    pub questions: QuestionRepository,
    pub scores: ScoreRepository,
}

impl QuizApp {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            questions: QuestionRepository::new(storage.clone()),
            scores: ScoreRepository::new(storage),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    MultipleChoice,
    TrueFalse,
}

impl From<KindArg> for QuestionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::MultipleChoice => QuestionKind::MultipleChoice,
            KindArg::TrueFalse => QuestionKind::TrueFalse,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct QuestionArgs {
    /// Kind of question
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Number of answer slots for a multiple-choice question
    #[arg(long)]
    pub option_count: Option<usize>,

    /// Answer text, repeated once per option in display order
    #[arg(long = "option")]
    pub options: Vec<String>,

    /// Position of the right answer, starting at 1
    #[arg(long)]
    pub correct: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the stored questions
    List,

    /// Author a new question
    Add {
        /// The prompt
        text: String,

        #[command(flatten)]
        question: QuestionArgs,
    },

    /// Change a stored question
    Edit {
        /// Position in `list`, starting at 1
        position: usize,

        /// New prompt
        #[arg(long)]
        text: Option<String>,

        #[command(flatten)]
        question: QuestionArgs,
    },

    /// Remove a stored question
    Delete {
        /// Position in `list`, starting at 1
        position: usize,
    },

    /// Write every question to a JSON file
    Export {
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },

    /// Replace every question with the contents of a JSON file
    Import {
        file: PathBuf,
    },

    /// Play a quiz on the terminal
    Play {
        /// Player name
        #[arg(long)]
        name: String,

        /// Number of questions to draw
        #[arg(long, default_value = "4")]
        count: usize,
    },

    /// Show recorded scores
    Scores {
        /// Order by points, best first
        #[arg(long)]
        ranking: bool,
    },

    /// Remove a recorded score
    DeleteScore {
        /// Position in `scores`, starting at 1
        position: usize,

        /// Count positions in the ranking order
        #[arg(long)]
        ranking: bool,
    },
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| QuizError::Validation("Positions start at 1".to_string()))
}

fn apply_question_args(draft: &mut QuestionDraft, args: QuestionArgs) -> Result<()> {
    if let Some(kind) = args.kind {
        draft.kind = kind.into();
    }

    let count = match args.option_count {
        Some(count) => Some(count),
        None if !args.options.is_empty() => Some(args.options.len().max(MIN_OPTION_COUNT)),
        None => None,
    };
    if let Some(count) = count {
        draft.resize_options(count)?;
    }

    for (position, option) in args.options.iter().enumerate() {
        draft.set_option(position, option)?;
    }

    if let Some(correct) = args.correct {
        draft.select_correct(to_index(correct)?)?;
    }
    Ok(())
}

fn kind_label(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::MultipleChoice => "Multiple choice",
        QuestionKind::TrueFalse => "True/False",
    }
}

fn print_questions(output: &mut dyn Write, questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        writeln!(output, "No questions yet.")?;
        return Ok(());
    }

    for (index, question) in questions.iter().enumerate() {
        writeln!(output, "{}. {}", index + 1, question.text)?;
        writeln!(output, "   Type: {}", kind_label(question.kind))?;
        writeln!(output, "   Options: {}", question.options.join(", "))?;
        writeln!(
            output,
            "   Answer: {}",
            question.correct_option().unwrap_or("?")
        )?;
    }
    Ok(())
}

fn print_scores(output: &mut dyn Write, scores: &[Score]) -> Result<()> {
    if scores.is_empty() {
        writeln!(output, "No scores yet.")?;
        return Ok(());
    }

    for (index, score) in scores.iter().enumerate() {
        writeln!(output, "{}. {}", index + 1, score)?;
    }
    Ok(())
}

pub async fn execute_command(
    command: Command,
    app: &mut QuizApp,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::List => {
            let questions = app.questions.list().await;
            print_questions(output, &questions)?;
        }
        Command::Add { text, question } => {
            let mut draft = QuestionDraft {
                text,
                ..QuestionDraft::default()
            };
            apply_question_args(&mut draft, question)?;

            let questions = app.questions.add(draft.to_question()).await?;
            writeln!(output, "Question {} added.", questions.len())?;
        }
        Command::Edit {
            position,
            text,
            question,
        } => {
            let index = to_index(position)?;
            let questions = app.questions.list().await;
            let existing = questions.get(index).ok_or(QuizError::OutOfRange {
                position,
                len: questions.len(),
            })?;

            let mut draft = QuestionDraft::from(existing);
            if let Some(text) = text {
                draft.text = text;
            }
            apply_question_args(&mut draft, question)?;

            app.questions.update(index, draft.to_question()).await?;
            writeln!(output, "Question {} updated.", position)?;
        }
        Command::Delete { position } => {
            let remaining = app.questions.delete(to_index(position)?).await?;
            writeln!(
                output,
                "Question {} deleted, {} left.",
                position,
                remaining.len()
            )?;
        }
        Command::Export { output: path } => {
            let exported = app.questions.export_all().await?;
            std::fs::write(&path, exported)?;
            info!("Exported questions to: {}", path.display());
            writeln!(output, "Questions exported to {}.", path.display())?;
        }
        Command::Import { file } => {
            let payload = std::fs::read_to_string(&file)?;
            let questions = app.questions.import_all(&payload).await?;
            writeln!(output, "{} questions imported.", questions.len())?;
        }
        Command::Play { name, count } => {
            play(app, &name, count, input, output).await?;
        }
        Command::Scores { ranking } => {
            let scores = if ranking {
                app.scores.ranking().await
            } else {
                app.scores.deduplicated_view().await
            };
            print_scores(output, &scores)?;
        }
        Command::DeleteScore { position, ranking } => {
            if ranking {
                app.scores.ranking().await;
            } else {
                app.scores.deduplicated_view().await;
            }
            let remaining = app.scores.delete(to_index(position)?).await?;
            print_scores(output, &remaining)?;
        }
    }

    Ok(())
}

async fn play(
    app: &mut QuizApp,
    name: &str,
    count: usize,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<()> {
    let pool = app.questions.list().await;
    let mut session = QuizSession::start(name, count, &pool)?;

    loop {
        writeln!(
            output,
            "\n[{}/{}] {}",
            session.position() + 1,
            session.total(),
            session.current_question().text
        )?;
        for (index, option) in session.shuffled_view().options.iter().enumerate() {
            writeln!(output, "  {}. {}", index + 1, option)?;
        }
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            warn!("Quiz abandoned by {}", name);
            writeln!(output, "\nQuiz abandoned.")?;
            return Ok(());
        }
        let selected = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|choice| choice.checked_sub(1));

        let options = session.shuffled_view().options.clone();
        match session.submit_answer(selected, &mut app.scores).await {
            Ok(outcome) => {
                if outcome.correct {
                    writeln!(output, "Correct!")?;
                } else {
                    writeln!(
                        output,
                        "Wrong, the answer was: {}",
                        options[outcome.correct_index]
                    )?;
                }
                if let Some(score) = outcome.final_score {
                    writeln!(output, "\nFinal score: {}", score)?;
                    return Ok(());
                }
            }
            Err(error @ (QuizError::NoSelection | QuizError::OutOfRange { .. })) => {
                writeln!(output, "{}", error.user_message())?;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::io::Cursor;

    fn app() -> QuizApp {
        QuizApp::new(Arc::new(MemoryStorage::new()))
    }

    async fn run(app: &mut QuizApp, command: Command, input: &str) -> Result<String> {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        execute_command(command, app, &mut input, &mut output).await?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn add(text: &str, options: &[&str], correct: usize) -> Command {
        Command::Add {
            text: text.to_string(),
            question: QuestionArgs {
                options: options.iter().map(|o| o.to_string()).collect(),
                correct: Some(correct),
                ..QuestionArgs::default()
            },
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let mut app = app();
        run(&mut app, add("Capital of Peru?", &["Lima", "Cusco"], 1), "")
            .await
            .unwrap();
        let listed = run(&mut app, Command::List, "").await.unwrap();
        assert!(listed.contains("1. Capital of Peru?"));
        assert!(listed.contains("Answer: Lima"));
    }

    #[tokio::test]
    async fn test_add_true_false() {
        let mut app = app();
        let command = Command::Add {
            text: "Rust has null".to_string(),
            question: QuestionArgs {
                kind: Some(KindArg::TrueFalse),
                correct: Some(2),
                ..QuestionArgs::default()
            },
        };
        run(&mut app, command, "").await.unwrap();
        let questions = app.questions.list().await;
        assert_eq!(questions[0], Question::true_false("Rust has null", 1));
    }

    #[tokio::test]
    async fn test_add_without_options_is_rejected() {
        let mut app = app();
        let command = Command::Add {
            text: "Empty answers".to_string(),
            question: QuestionArgs::default(),
        };
        assert!(matches!(
            run(&mut app, command, "").await,
            Err(QuizError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_edit_shrinks_options() {
        let mut app = app();
        run(&mut app, add("Letter?", &["A", "B", "C", "D"], 4), "")
            .await
            .unwrap();

        let command = Command::Edit {
            position: 1,
            text: None,
            question: QuestionArgs {
                option_count: Some(2),
                ..QuestionArgs::default()
            },
        };
        run(&mut app, command, "").await.unwrap();

        let questions = app.questions.list().await;
        assert_eq!(questions[0].options, vec!["A", "B"]);
        assert_eq!(questions[0].correct_index, 0);
    }

    #[tokio::test]
    async fn test_delete_position_zero_is_rejected() {
        let mut app = app();
        assert!(matches!(
            run(&mut app, Command::Delete { position: 0 }, "").await,
            Err(QuizError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_play_records_score() {
        let mut app = app();
        run(&mut app, add("One?", &["1", "2"], 1), "").await.unwrap();
        run(&mut app, add("Two?", &["1", "2"], 2), "").await.unwrap();

        let command = Command::Play {
            name: "Alice".to_string(),
            count: 2,
        };
        let transcript = run(&mut app, command, "\n1\n1\n").await.unwrap();
        assert!(transcript.contains("Select an answer first"));
        assert!(transcript.contains("Final score: Alice: "));

        let scores = app.scores.list().await;
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].total, 2);
    }

    #[tokio::test]
    async fn test_play_abandoned_on_eof() {
        let mut app = app();
        run(&mut app, add("One?", &["1", "2"], 1), "").await.unwrap();

        let command = Command::Play {
            name: "Bob".to_string(),
            count: 1,
        };
        let transcript = run(&mut app, command, "").await.unwrap();
        assert!(transcript.contains("Quiz abandoned."));
        assert!(app.scores.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_export_and_import_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);

        let mut source = app();
        run(&mut source, add("Capital of Peru?", &["Lima", "Cusco"], 1), "")
            .await
            .unwrap();
        run(&mut source, Command::Export { output: path.clone() }, "")
            .await
            .unwrap();

        let mut target = app();
        let out = run(&mut target, Command::Import { file: path }, "")
            .await
            .unwrap();
        assert!(out.contains("1 questions imported."));
        assert_eq!(target.questions.list().await, source.questions.list().await);
    }
}

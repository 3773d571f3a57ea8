use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blockbusters_core::*;
use roxmltree::{Document, Node};

const OPTION_TAGS: [&str; 4] = ["A", "B", "C", "D"];

/// Collections compiled into the binary, used when no files are given.
const BUILTIN: [(&str, &str); 3] = [
    (
        "general.xml",
        include_str!("../../assets/questions/general.xml"),
    ),
    (
        "geography.xml",
        include_str!("../../assets/questions/geography.xml"),
    ),
    (
        "science.xml",
        include_str!("../../assets/questions/science.xml"),
    ),
];

/// Parses one collection. The root element names the category; every `QA`
/// child is one record. Broken records are skipped with a warning.
pub fn parse_collection(xml: &str) -> Result<Vec<QuestionRecord>> {
    let doc = Document::parse(xml).context("Malformed question XML")?;
    let root = doc.root_element();
    let category = root.tag_name().name();

    let mut records = Vec::new();
    for (index, qa) in root
        .children()
        .filter(|node| node.has_tag_name("QA"))
        .enumerate()
    {
        match parse_record(category, qa) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("Skipping {category} question #{}: {err:#}", index + 1),
        }
    }
    Ok(records)
}

fn parse_record(category: &str, qa: Node) -> Result<QuestionRecord> {
    let question = child(qa, "Question")?;
    let answer = first_char(question.attribute("answer"))
        .and_then(OptionLetter::from_char)
        .context("missing or invalid `answer`")?;
    let difficulty = question
        .attribute("difficulty")
        .and_then(Difficulty::from_tag)
        .context("missing or invalid `difficulty`")?;
    let letter = first_char(question.attribute("alpha"))
        .context("missing `alpha`")?
        .to_ascii_uppercase();

    let answers = child(qa, "Answers")?;
    let options = OPTION_TAGS.map(|tag| {
        answers
            .children()
            .find(|node| node.has_tag_name(tag))
            .map(text)
            .unwrap_or_default()
    });

    let record = QuestionRecord {
        category: category.to_string(),
        difficulty,
        question: text(question),
        options,
        answer,
        letter,
    };
    record.validate()?;
    Ok(record)
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .with_context(|| format!("missing <{tag}>"))
}

fn text(node: Node) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

fn first_char(value: Option<&str>) -> Option<char> {
    value.and_then(|value| value.trim().chars().next())
}

/// Loads every collection in `paths` into one bank, or the built-in set when
/// `paths` is empty.
pub fn load_bank(paths: &[PathBuf], seed: u64) -> Result<QuestionBank> {
    let mut bank = QuestionBank::new(seed);

    if paths.is_empty() {
        for (name, xml) in BUILTIN {
            let records = parse_collection(xml).with_context(|| format!("Built-in {name}"))?;
            bank.extend(records);
        }
    }

    for path in paths {
        let xml = fs::read_to_string(path)
            .with_context(|| format!("Could not read questions {}", path.display()))?;
        let records =
            parse_collection(&xml).with_context(|| format!("In {}", path.display()))?;
        let count = records.len();
        let rejected = bank.extend(records);
        log::info!(
            "Loaded {} questions from {}",
            count - rejected,
            path.display()
        );
    }

    log::debug!("Question categories: {:?}", bank.categories());
    Ok(bank)
}

use crate::{
    error::{AppError, AppResult},
    models::{QuizOption, QuizQuestion},
    services::generator::{GenerationRequest, TextGenerator},
};

/// Builds the quiz prompt for one explanation layer
pub fn quiz_prompt(layer_text: &str, question_count: usize) -> String {
    format!(
        "Create {} multiple-choice questions from this explanation:\n\
         {}\n\
         Format exactly like this:\n\
         Q: <question text>\n\
         A) option1\n\
         B) option2\n\
         C) option3\n\
         D) option4\n\
         Answer: B\n",
        question_count, layer_text
    )
}

/// Asks the generator for a quiz and parses it
///
/// A generator failure, or a reply with no usable question, is reported as
/// a generic generation failure.
pub async fn generate_quiz(
    generator: &dyn TextGenerator,
    layer_text: &str,
    question_count: usize,
) -> AppResult<Vec<QuizQuestion>> {
    let request = GenerationRequest::new(quiz_prompt(layer_text, question_count));

    let reply = generator.generate(&request).await.map_err(|e| {
        tracing::error!(error = %e, generator = generator.name(), "Quiz generation failed");
        AppError::Generation
    })?;

    let questions = parse_quiz(&reply);
    if questions.is_empty() {
        tracing::error!(
            reply_chars = reply.len(),
            "Quiz reply contained no parseable question"
        );
        return Err(AppError::Generation);
    }

    tracing::info!(questions = questions.len(), "Quiz generated");
    Ok(questions)
}

/// Parses `Q:` / `A)`..`D)` / `Answer: X` blocks
///
/// Blocks with fewer than two options, or whose answer names no listed
/// option, are skipped. Markdown emphasis and list numbering are tolerated.
pub fn parse_quiz(reply: &str) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();
    let mut current: Option<(String, Vec<QuizOption>)> = None;

    for raw in reply.lines() {
        let line = raw.trim().trim_matches('*').trim();
        if line.is_empty() {
            continue;
        }

        if let Some(text) = strip_question_prefix(line) {
            current = Some((text.to_string(), Vec::new()));
            continue;
        }

        let Some((question, options)) = current.as_mut() else {
            continue;
        };

        if let Some(answer) = strip_answer_prefix(line) {
            if options.len() >= 2 {
                if let Some(label) = resolve_answer(answer, options) {
                    questions.push(QuizQuestion {
                        question: question.clone(),
                        options: std::mem::take(options),
                        answer: label,
                    });
                }
            }
            current = None;
        } else if let Some(option) = parse_option(line) {
            options.push(option);
        } else if options.is_empty() {
            question.push(' ');
            question.push_str(line);
        }
    }

    questions
}

fn strip_question_prefix(line: &str) -> Option<&str> {
    let unnumbered = line
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['.', ')'])
        .trim_start()
        .trim_start_matches('*');

    let rest = unnumbered
        .strip_prefix("Q:")
        .or_else(|| unnumbered.strip_prefix("q:"))?;

    let text = rest.trim_start_matches('*').trim();
    (!text.is_empty()).then_some(text)
}

fn strip_answer_prefix(line: &str) -> Option<&str> {
    let head = line.get(..7)?;
    head.eq_ignore_ascii_case("answer:")
        .then(|| line[7..].trim_start_matches('*').trim())
}

/// Maps an `Answer:` value to an option label
///
/// Accepts a lone label (`B`, `B)`, `B.`), a label followed by that option's
/// text, or the option text on its own. Anything else resolves to `None`.
fn resolve_answer(answer: &str, options: &[QuizOption]) -> Option<String> {
    let answer = answer.trim();
    let option_with_label = |label: &str| options.iter().find(|o| o.label == label);

    let mut chars = answer.chars();
    if let Some(first) = chars.next().filter(|c| c.is_ascii_alphabetic()) {
        let label = first.to_ascii_uppercase().to_string();
        let rest = chars.as_str();

        if let Some(option) = option_with_label(&label) {
            let tail = rest.trim_start_matches([')', '.']).trim();
            let labelled = rest.is_empty() || rest.starts_with([')', '.', ' ']);
            if labelled && (tail.is_empty() || same_text(tail, &option.text)) {
                return Some(label);
            }
        }
    }

    options
        .iter()
        .find(|o| same_text(answer, &o.text))
        .map(|o| o.label.clone())
}

fn same_text(a: &str, b: &str) -> bool {
    let normalize = |s: &str| s.trim().trim_end_matches('.').trim().to_lowercase();
    normalize(a) == normalize(b)
}

fn parse_option(line: &str) -> Option<QuizOption> {
    let mut chars = line.chars();
    let label = chars.next().filter(|c| c.is_ascii_uppercase())?;
    let separator = chars.next()?;
    if separator != ')' && separator != '.' {
        return None;
    }

    let text = chars.as_str().trim();
    (!text.is_empty()).then(|| QuizOption {
        label: label.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generator::MockTextGenerator;

    const REPLY: &str = "\
Q: What gas do plants absorb?
A) Oxygen
B) Carbon dioxide
C) Nitrogen
D) Helium
Answer: B

Q: Where does photosynthesis happen?
A) Roots
B) Chloroplasts
C) Bark
D) Seeds
Answer: B
";

    #[test]
    fn test_parses_well_formed_reply() {
        let questions = parse_quiz(REPLY);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "What gas do plants absorb?");
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].options[1].label, "B");
        assert_eq!(questions[0].options[1].text, "Carbon dioxide");
        assert_eq!(questions[0].answer, "B");
    }

    #[test]
    fn test_tolerates_numbering_and_emphasis() {
        let reply = "\
1. **Q:** What is H2O?
A. Water
B. Salt
**Answer:** a
";
        let questions = parse_quiz(reply);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is H2O?");
        assert_eq!(questions[0].answer, "A");
    }

    #[test]
    fn test_multiline_question_text_is_joined() {
        let reply = "Q: Which planet\nis largest?\nA) Mars\nB) Jupiter\nAnswer: B\n";
        let questions = parse_quiz(reply);
        assert_eq!(questions[0].question, "Which planet is largest?");
    }

    #[test]
    fn test_skips_blocks_with_unknown_answer_or_too_few_options() {
        let reply = "\
Q: Broken answer
A) One
B) Two
Answer: E
Q: One option only
A) Lonely
Answer: A
Q: Fine
A) Yes
B) No
Answer: A
";
        let questions = parse_quiz(reply);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Fine");
    }

    #[test]
    fn test_answer_given_as_option_text_maps_to_its_label() {
        let reply = "\
Q: Which gas do plants absorb?
A) Oxygen
B) Carbon dioxide
C) Nitrogen
Answer: Carbon dioxide
Q: Which gas do we breathe?
A) Oxygen
B) Argon
Answer: oxygen.
";
        let questions = parse_quiz(reply);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].answer, "B");
        assert_eq!(questions[1].answer, "A");
    }

    #[test]
    fn test_answer_label_may_carry_option_text() {
        let reply = "\
Q: Which gas do plants absorb?
A) Oxygen
B) Carbon dioxide
C) Nitrogen
Answer: B) Carbon dioxide
";
        assert_eq!(parse_quiz(reply)[0].answer, "B");
    }

    #[test]
    fn test_answer_matching_no_option_skips_block() {
        let reply = "\
Q: Which gas do plants absorb?
A) Oxygen
B) Carbon dioxide
C) Nitrogen
Answer: Chlorophyll
Q: Conflicting label and text
A) Oxygen
B) Carbon dioxide
Answer: A) Carbon dioxide
";
        assert!(parse_quiz(reply).is_empty());
    }

    #[test]
    fn test_free_text_yields_nothing() {
        assert!(parse_quiz("I'm sorry, I can't help with that.").is_empty());
    }

    #[test]
    fn test_prompt_mentions_count_and_format() {
        let prompt = quiz_prompt("Plants eat light.", 5);
        assert!(prompt.starts_with("Create 5 multiple-choice questions"));
        assert!(prompt.contains("Plants eat light."));
        assert!(prompt.contains("Answer: B"));
    }

    #[tokio::test]
    async fn test_generate_quiz_uses_generator_reply() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|request| request.prompt.contains("Plants eat light.") && request.temperature == 0.0)
            .times(1)
            .returning(|_| Ok(REPLY.to_string()));
        generator.expect_name().return_const("mock");

        let questions = generate_quiz(&generator, "Plants eat light.", 2).await.unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_generation_failure() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("no questions here".to_string()));
        generator.expect_name().return_const("mock");

        let result = generate_quiz(&generator, "text", 5).await;
        assert!(matches!(result, Err(AppError::Generation)));
    }

    #[tokio::test]
    async fn test_generator_error_is_generation_failure() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(AppError::ExternalApi("quota".to_string())));
        generator.expect_name().return_const("mock");

        let result = generate_quiz(&generator, "text", 5).await;
        assert!(matches!(result, Err(AppError::Generation)));
    }
}

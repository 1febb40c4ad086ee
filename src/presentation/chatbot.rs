//! Rule-based results assistant
//!
//! Answers questions by pattern matching, in this order:
//!
//! 1. FAQ table: substring match either way, or edit distance below
//!    [`FAQ_MAX_DISTANCE`]
//! 2. Result-specific keywords (only when a result is attached)
//! 3. General pancreas keywords
//! 4. Usage keywords
//! 5. Off-topic notice, or a generic "rephrase" reply
//!
//! # Example
//!
//! ```
//! use pancrescan::presentation::chatbot::{respond, FAQS};
//!
//! let answer = respond(FAQS[0].question, None)?;
//! assert_eq!(answer, FAQS[0].answer);
//! # Ok::<(), pancrescan::presentation::chatbot::ChatError>(())
//! ```

use thiserror::Error;

use crate::analysis::disease::Disease;
use crate::analysis::result::AnalysisResult;
use crate::analysis::risk::format_percent;

/// Messages strictly closer than this edit distance match an FAQ question
pub const FAQ_MAX_DISTANCE: usize = 5;

/// Reply for an empty message
pub const GREETING: &str = "I'm here to help with your questions about pancreatic conditions and analysis results. What would you like to know?";

/// First message of every chat
pub const WELCOME: &str = "Hello! I'm your PancreScan AI assistant. I can help you understand your results and answer questions about pancreatic conditions.";

/// Shown instead of a reply when answering fails
pub const APOLOGY: &str = "I apologize, but I'm having trouble processing your question. Please try again.";

const OFF_TOPIC: &str = "I'm specifically designed to help with pancreas-related questions, analysis results, and how to use this system. Could you please ask a question related to these topics?";

const NOT_UNDERSTOOD: &str = "I'm not sure I understand your question. Could you try rephrasing it or ask about pancreatic conditions, your results, or how to use this system?";

/// Errors while composing a reply
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// The attached result has no scores
    #[error("analysis result has no probabilities")]
    EmptyResult,

    /// The attached result lacks the explanation for its top disease
    #[error("no explanation for {0}")]
    MissingExplanation(Disease),
}

/// Canned question/answer pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faq {
    /// Lower-case question
    pub question: &'static str,
    /// Fixed answer
    pub answer: &'static str,
}

/// FAQ table
pub const FAQS: [Faq; 8] = [
    Faq {
        question: "what is pancreatic cancer",
        answer: "Pancreatic cancer is a disease where malignant (cancerous) cells form in the tissues of the pancreas. It typically has few symptoms in its early stages, which makes early detection challenging. Common symptoms in advanced stages include abdominal pain, jaundice, weight loss, and digestive problems. Risk factors include smoking, obesity, diabetes, family history, and certain genetic conditions. Early detection and treatment significantly improve survival rates.",
    },
    Faq {
        question: "what does this result mean",
        answer: "The results show the probability of four pancreatic conditions based on AI analysis of your scan. Higher percentages indicate a greater likelihood of that condition. The colored bars represent risk levels: green for low risk, yellow for moderate risk, and red for higher risk. The heatmap shows areas of concern. Remember that these results should be reviewed by a healthcare professional for proper diagnosis, as AI analysis is a screening tool, not a definitive diagnosis.",
    },
    Faq {
        question: "how accurate is the ai",
        answer: "Our AI system has been trained on specialized pancreatic imaging datasets and demonstrates high accuracy in detecting patterns associated with pancreatic conditions. However, like all medical AI systems, it has limitations. The accuracy varies by condition and image quality, with typical accuracy ranges of 80-90% for clear presentations of disease. Factors that can affect accuracy include image quality, unusual presentations of disease, and rare variants. This is why we always recommend having the results reviewed by a healthcare professional.",
    },
    Faq {
        question: "can i trust this report for medical consultation",
        answer: "While our AI analysis provides valuable insights, it should not replace professional medical advice. The report should be used as a discussion tool with your healthcare provider. Medical imaging interpretation is complex, and AI systems have limitations. Your doctor will consider your complete medical history, symptoms, and possibly additional tests when making a diagnosis. Always consult with a qualified healthcare professional before making any medical decisions based on these results.",
    },
    Faq {
        question: "what is chronic pancreatitis",
        answer: "Chronic pancreatitis is a long-lasting inflammation of the pancreas that alters its normal structure and function. It develops gradually, often after multiple episodes of acute pancreatitis. The condition leads to digestive problems, diabetes, and chronic pain as the pancreas loses its ability to produce digestive enzymes and insulin. Common causes include alcoholism, genetic factors, autoimmune conditions, and blockages in the pancreatic duct. Treatment focuses on pain management, enzyme replacement therapy, and lifestyle modifications.",
    },
    Faq {
        question: "what are pancreatic cysts",
        answer: "Pancreatic cysts are fluid-filled sacs within the pancreas. While many are benign (non-cancerous), some types can be or become cancerous. Most pancreatic cysts are found incidentally during imaging for other conditions. Different types include serous cystadenomas (rarely become cancerous), mucinous cystic neoplasms (potential to become cancerous), intraductal papillary mucinous neoplasms (IPMNs), and pseudocysts (usually from inflammation). Regular monitoring is important, particularly for mucinous cysts which have higher malignancy potential.",
    },
    Faq {
        question: "what is acute pancreatitis",
        answer: "Acute pancreatitis is sudden inflammation of the pancreas that can range from mild discomfort to a life-threatening emergency. Common causes include gallstones, alcohol consumption, certain medications, infections, and trauma. Symptoms typically include severe abdominal pain (often radiating to the back), nausea, vomiting, and fever. Most cases resolve with supportive care including IV fluids, pain management, and fasting, but severe cases can lead to tissue damage, infection, or organ failure. Recurrent episodes may lead to chronic pancreatitis.",
    },
    Faq {
        question: "what does the heatmap show",
        answer: "The heatmap overlay highlights areas in your scan that the AI system has identified as potentially abnormal. Warmer colors (red/orange) indicate regions that most strongly influenced the AI's assessment, often corresponding to areas with features associated with disease. These could be areas of inflammation, structural changes, abnormal tissue density, or other concerning characteristics. The heatmap helps visualize where in the pancreas the potential issues are located, which can be valuable information for healthcare professionals during their evaluation.",
    },
];

/// Terms that mark a message as on-topic
const DOMAIN_TERMS: [&str; 24] = [
    "pancreas", "pancreat", "dicom", "scan", "imaging", "cancer", "cyst", "tumor",
    "inflammation", "analysis", "result", "doctor", "symptom", "treatment", "diagnosis",
    "report", "image", "upload", "heatmap", "pdf", "medical", "disease", "condition", "health",
];

/// Answer a user message, optionally about an attached result
///
/// # Errors
///
/// Returns `ChatError` when a result-specific question refers to a result
/// that cannot answer it. Callers replace the reply with [`APOLOGY`].
pub fn respond(message: &str, result: Option<&AnalysisResult>) -> Result<String, ChatError> {
    let message = message.trim().to_lowercase();

    if message.is_empty() {
        return Ok(GREETING.to_string());
    }

    if let Some(answer) = find_faq_match(&message) {
        log::debug!("Chat message matched FAQ");
        return Ok(answer.to_string());
    }

    if let Some(result) = result {
        if let Some(reply) = results_reply(&message, result)? {
            return Ok(reply);
        }
    }

    if let Some(reply) = pancreas_reply(&message).or_else(|| usage_reply(&message)) {
        return Ok(reply.to_string());
    }

    if is_off_topic(&message) {
        Ok(OFF_TOPIC.to_string())
    } else {
        Ok(NOT_UNDERSTOOD.to_string())
    }
}

/// FAQ answer for a lower-cased message
pub fn find_faq_match(message: &str) -> Option<&'static str> {
    FAQS.iter()
        .find(|faq| {
            message.contains(faq.question)
                || faq.question.contains(message)
                || levenshtein(message, faq.question) < FAQ_MAX_DISTANCE
        })
        .map(|faq| faq.answer)
}

/// Edit distance (insertions, deletions, substitutions) over chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn contains_any(message: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| message.contains(n))
}

fn results_reply(message: &str, result: &AnalysisResult) -> Result<Option<String>, ChatError> {
    let asks_highest = contains_any(message, &["highest risk", "most likely", "biggest concern"]);
    let asks_explain = contains_any(
        message,
        &["explain my results", "interpret these results", "what do my results mean"],
    );
    if !asks_highest && !asks_explain {
        return Ok(None);
    }

    let (disease, probability) = result.highest().ok_or(ChatError::EmptyResult)?;
    let percent = format_percent(probability);

    if asks_highest {
        let explanation = result
            .explanation(disease)
            .ok_or(ChatError::MissingExplanation(disease))?;
        let first_sentence = explanation.split('.').next().unwrap_or_default();
        return Ok(Some(format!(
            "Based on the analysis, {} shows the highest probability at {}. {}.",
            disease.display_name(),
            percent,
            first_sentence
        )));
    }

    let significance = if probability > 0.5 {
        "This is considered a significant finding."
    } else {
        "This finding suggests moderate to low likelihood."
    };
    Ok(Some(format!(
        "Your scan analysis shows probabilities for four pancreatic conditions. The highest probability is {} for {}. {} The colored bars indicate risk levels (green for low, yellow for moderate, red for higher). Remember that these results should be reviewed by a healthcare professional, as AI analysis is a screening tool, not a definitive diagnosis.",
        percent,
        disease.display_name(),
        significance
    )))
}

fn pancreas_reply(message: &str) -> Option<&'static str> {
    if contains_any(message, &["what does the pancreas do", "pancreas function", "role of pancreas"]) {
        return Some("The pancreas serves two major functions: It produces digestive enzymes that break down food in the small intestine (exocrine function), and it produces hormones like insulin and glucagon that regulate blood sugar levels (endocrine function). Located behind the stomach, this organ is crucial for both digestion and metabolism.");
    }

    if message.contains("symptoms") && contains_any(message, &["pancreas", "pancreatic"]) {
        return Some("Common symptoms of pancreatic issues can include abdominal pain (often radiating to the back), nausea and vomiting, unintended weight loss, jaundice (yellowing of skin/eyes), light-colored stools, dark urine, and new-onset diabetes. Different conditions have different symptom patterns. Pancreatic cancer often has few symptoms until advanced stages, while pancreatitis typically causes severe pain. Any persistent symptoms should be evaluated by a healthcare professional.");
    }

    if contains_any(message, &["treatment", "cure", "therapy"]) {
        return Some("Treatment for pancreatic conditions varies depending on the specific diagnosis. Acute pancreatitis often requires hospitalization with IV fluids and pain management. Chronic pancreatitis may be managed with enzyme supplements, dietary changes, and pain control. Pancreatic cancer treatment depends on stage and location but may include surgery, chemotherapy, radiation, or targeted therapies. Pancreatic cysts might be monitored, drained, or surgically removed depending on their type and characteristics. All treatment plans should be developed with healthcare professionals based on individual circumstances.");
    }

    if contains_any(message, &["prevent", "reduce risk", "avoid"]) {
        return Some("While not all pancreatic conditions can be prevented, you can reduce risk factors by: maintaining a healthy weight, avoiding tobacco, limiting alcohol consumption, eating a balanced diet rich in fruits and vegetables, staying physically active, and managing conditions like diabetes. Regular check-ups are important, especially if you have risk factors such as family history of pancreatic conditions or genetic syndromes associated with increased risk.");
    }

    None
}

fn usage_reply(message: &str) -> Option<&'static str> {
    if contains_any(message, &["how to upload", "upload image", "submit scan"]) {
        return Some("To upload a scan: 1) Run the analyze command with the path to your image, 2) Select a JPG, PNG, or DICOM (.dcm) file, 3) Wait for the analysis to complete and review the results. The system works best with DICOM files from CT or MRI scans, but can also analyze standard image formats.");
    }

    if contains_any(message, &["download report", "get pdf", "save results"]) {
        return Some("To download your analysis as a PDF report: 1) Analyze your scan, 2) Pass the --report option with an output path, 3) The report will be generated and written to that path. The PDF contains a summary of findings, probability scores, medical explanations, and important notes to discuss with your healthcare provider.");
    }

    if contains_any(message, &["what file", "supported format", "file type"]) {
        return Some("The system supports the following file formats: 1) DICOM (.dcm) files from CT and MRI scans - these provide the most accurate analysis as they contain complete medical imaging data, 2) Standard image formats including JPG/JPEG and PNG - these might be screenshots or exported images from medical imaging systems. For optimal results, we recommend using DICOM files whenever possible.");
    }

    if contains_any(message, &["how accurate", "reliability", "trust the result"]) {
        return Some("Our AI system demonstrates high accuracy in detecting patterns associated with pancreatic conditions, with typical accuracy ranges of 80-90% for clear presentations of disease. However, the system has limitations and should be used as a screening tool, not for definitive diagnosis. Factors affecting accuracy include image quality, unusual disease presentations, and rare variants. Always consult with a healthcare professional to interpret the results in the context of your complete medical history.");
    }

    None
}

fn is_off_topic(message: &str) -> bool {
    !contains_any(message, &DOMAIN_TERMS)
}

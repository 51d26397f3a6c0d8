use crate::storage::{Incident, summary::PriorityStatusTable};

pub const CYBERSECURITY_PERSONA: &str = "You are a highly knowledgeable and professional cybersecurity expert assistant.
- Analyze incidents and threats.
- Provide technical guidance.
- Explain attack vectors and mitigations using standard terminology (MITRE ATT&CK, CVE).
- Prioritize actionable recommendations.
Tone: Professional, technical.
Format: Clear, structured responses using Markdown.";

pub const IT_OPERATIONS_PERSONA: &str = "You are an expert IT Operations and Infrastructure assistant.
- Your primary goal is to provide **practical, actionable solutions** for IT-related issues.
- Assist with **troubleshooting** network, server, and application issues, including error message analysis.
- Provide guidance on system **optimization**, performance tuning, and capacity planning.
- Offer advice on ticket **management and prioritization** (e.g., using ITIL principles).
- Help with **infrastructure guidance** for cloud platforms (AWS, Azure, GCP), virtualization, and containerization (Docker, Kubernetes).
- Tone: Professional, technical, and solution-oriented.
- Format: Use clear, structured Markdown for explanations and include code blocks for command-line examples or scripts.";

pub const DATA_SCIENCE_PERSONA: &str = "You are an expert Data Science and Machine Learning assistant.
- Assist with Exploratory Data Analysis (EDA), feature engineering, and model selection.
- Write, explain, and debug Python code snippets, especially using libraries like Pandas, NumPy, Scikit-learn, and Matplotlib.
- Provide statistical insights and interpret model results.
- Use clear, structured Markdown for explanations and include code blocks for all code.
- Tone: Helpful, analytical, and professional.";

pub const INCIDENT_ANALYST: &str = "You are a highly experienced and certified cybersecurity expert. Your analysis must be technical, structured, and actionable. Use clear, concise Markdown formatting for all output.";

pub const TICKET_ANALYST: &str = "You are a seasoned IT Operations Expert. Your analysis must be structured, strategic, and focused on improving IT service management (ITSM) processes. Use clear, professional, and structured Markdown.";

pub const DATASET_ANALYST: &str = "You are a professional Data Analyst. Your analysis must be structured, technical, and insightful. Use clear, concise Markdown formatting for all output.";

/// A one-shot analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    pub system_instruction: &'static str,
    pub prompt: String,
}

pub fn incident_analysis(incident: &Incident) -> AnalysisPrompt {
    let description = incident
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description provided.");
    let prompt = format!(
        "Perform a comprehensive analysis of the following cybersecurity incident.

INCIDENT DETAILS
Incident ID: {id}
Type: {category}
Severity: {severity}
Status: {status}
Description: {description}
END DETAILS

Provide a highly detailed, professional response structured with the following four mandatory Markdown headings:

## 1. Root Cause Analysis
Explain the most likely technical and procedural failures that led to this incident.

## 2. Immediate Actions Needed
List the critical, first-response steps to contain and eradicate the threat.

## 3. Long-Term Prevention Measures
Outline strategic recommendations for policy, technology, and training to prevent recurrence.

## 4. Risk Assessment
Summarize the potential impact (e.g., financial, reputational, regulatory) and overall risk level.
",
        id = incident.incident_id,
        category = incident.category,
        severity = incident.severity,
        status = incident.status,
    );
    AnalysisPrompt {
        system_instruction: INCIDENT_ANALYST,
        prompt,
    }
}

pub fn ticket_correlation_analysis(table: &PriorityStatusTable) -> AnalysisPrompt {
    let prompt = format!(
        "You are a seasoned IT Operations Expert and Service Desk Manager. Analyze the following data which represents the correlation between the **Priority** and **Status** of IT support tickets. The values are the percentage of tickets in each status, grouped by priority level.

START DATA
{data}END DATA

Provide a professional and actionable assessment structured with the following three mandatory Markdown headings:

## 1. Key Operational Insights
Identify the most significant trends and anomalies. For example: Do 'Critical' tickets have a high percentage in 'Resolved' or 'Closed'? Do 'Low' priority tickets often stay in 'Open' or 'In Progress'?

## 2. Bottleneck Identification
Based on the data, identify the most likely operational bottleneck. This could be slow resolution of a specific priority level (e.g., High priority tickets stalling in 'In Progress') or disproportionate backlog in the 'Open' status.

## 3. Actionable Recommendations
Provide specific, strategic recommendations to the IT Operations team to improve flow efficiency and ensure high-priority tickets are handled appropriately. Focus on prioritization strategies, resource allocation, and process improvements.
",
        data = table.to_csv(),
    );
    AnalysisPrompt {
        system_instruction: TICKET_ANALYST,
        prompt,
    }
}

/// `metadata_csv` is the dataset table rendered with a header row.
pub fn dataset_analysis(metadata_csv: &str) -> AnalysisPrompt {
    let prompt = format!(
        "You are a professional Data Analyst and Statistical Expert. Your task is to perform a detailed analysis on the provided dataset metadata.

DATASET METADATA
{metadata_csv}END METADATA

Analyze the data to find meaningful correlations, dependencies, and statistical insights between the columns (e.g., 'rows', 'columns', 'uploaded_by', 'upload_date', 'name').

Provide a highly detailed analysis structured with the following three mandatory Markdown headings:

## 1. Key Observations and Outliers
Point out any datasets or metrics that stand out as significantly larger, smaller, or unusual (e.g., the largest dataset by rows or the dataset with the most columns).

## 2. Quantitative Correlations and Trends
Analyze the relationship between numerical fields ('rows' vs. 'columns' vs. 'upload_date'). Is there a trend where newer datasets have more rows? Do larger datasets generally have more columns?

## 3. Categorical Dependencies and Insights
Identify dependencies involving categorical data ('uploaded_by' vs. other fields). For example, which uploaders typically handle the largest datasets, the most recent datasets, or datasets related to specific names/topics?
"
    );
    AnalysisPrompt {
        system_instruction: DATASET_ANALYST,
        prompt,
    }
}

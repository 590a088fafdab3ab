//! Mô hình dữ liệu lõi cho pipeline chuyển bundle lâm sàng thành văn bản tường thuật.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Giá trị `resourceType` bắt buộc của một bundle.
pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";

/// Loại bundle khai báo trong trường `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BundleType {
    Batch,
    Transaction,
    Searchset,
    Collection,
    Other(String),
}

impl BundleType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "batch" => Self::Batch,
            "transaction" => Self::Transaction,
            "searchset" => Self::Searchset,
            "collection" => Self::Collection,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Batch => "batch",
            Self::Transaction => "transaction",
            Self::Searchset => "searchset",
            Self::Collection => "collection",
            Self::Other(code) => code,
        }
    }
}

/// Bundle đã qua kiểm tra, danh sách entry luôn tồn tại (có thể rỗng).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bundle {
    pub bundle_type: BundleType,
    pub entries: Vec<BundleEntry>,
}

impl Bundle {
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            bundle_type,
            entries: Vec::new(),
        }
    }
}

/// Một ô trong bundle, có thể không chứa resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BundleEntry {
    pub resource: Option<Resource>,
}

/// Bộ ba system/code/display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coding {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

/// Khái niệm mã hóa kèm nhãn văn bản tùy chọn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeableConcept {
    pub text: Option<String>,
    pub coding: Vec<Coding>,
}

impl CodeableConcept {
    pub fn first_coding(&self) -> Option<&Coding> {
        self.coding.first()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HumanName {
    pub given: Vec<String>,
    pub family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: Option<String>,
    pub name: Vec<HumanName>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Condition {
    pub id: Option<String>,
    /// Tham chiếu bệnh nhân, ví dụ `Patient/p1`.
    pub subject: Option<String>,
    pub code: Option<CodeableConcept>,
    pub clinical_status: Option<CodeableConcept>,
}

/// Hai loại resource thuốc dùng chung một nhóm.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MedicationKind {
    #[default]
    Medication,
    MedicationRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub kind: MedicationKind,
    pub id: Option<String>,
    pub subject: Option<String>,
    pub medication: Option<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Quantity {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

/// Quan sát lâm sàng. Về nguyên tắc chỉ có một trong ba trường giá trị,
/// nhưng dữ liệu thực tế có thể chứa nhiều hơn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub code: Option<CodeableConcept>,
    pub value_quantity: Option<Quantity>,
    pub value_string: Option<String>,
    pub value_codeable_concept: Option<CodeableConcept>,
}

/// Resource không thuộc nhóm được nhận diện; chỉ giữ loại và định danh.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtherResource {
    pub resource_type: Option<String>,
    pub id: Option<String>,
}

/// Resource lâm sàng đã phân loại theo `resourceType`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Resource {
    Patient(Patient),
    Condition(Condition),
    Medication(Medication),
    Observation(Observation),
    Other(OtherResource),
}

impl Resource {
    /// Tên loại resource như khai báo trong dữ liệu gốc.
    pub fn resource_type(&self) -> Option<&str> {
        match self {
            Self::Patient(_) => Some("Patient"),
            Self::Condition(_) => Some("Condition"),
            Self::Medication(medication) => Some(match medication.kind {
                MedicationKind::Medication => "Medication",
                MedicationKind::MedicationRequest => "MedicationRequest",
            }),
            Self::Observation(_) => Some("Observation"),
            Self::Other(other) => other.resource_type.as_deref(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Patient(patient) => patient.id.as_deref(),
            Self::Condition(condition) => condition.id.as_deref(),
            Self::Medication(medication) => medication.id.as_deref(),
            Self::Observation(observation) => observation.id.as_deref(),
            Self::Other(other) => other.id.as_deref(),
        }
    }
}

/// Các nhóm resource sau khi phân loại, giữ nguyên thứ tự xuất hiện.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategorizedResources {
    pub patients: Vec<Patient>,
    pub conditions: Vec<Condition>,
    pub medications: Vec<Medication>,
    pub observations: Vec<Observation>,
    pub other: Vec<OtherResource>,
}

impl CategorizedResources {
    /// Đưa resource vào đúng nhóm.
    pub fn insert(&mut self, resource: Resource) {
        match resource {
            Resource::Patient(patient) => self.patients.push(patient),
            Resource::Condition(condition) => self.conditions.push(condition),
            Resource::Medication(medication) => self.medications.push(medication),
            Resource::Observation(observation) => self.observations.push(observation),
            Resource::Other(other) => self.other.push(other),
        }
    }

    pub fn len(&self) -> usize {
        self.patients.len()
            + self.conditions.len()
            + self.medications.len()
            + self.observations.len()
            + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Kết quả bàn giao cho bước tóm tắt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeOutput {
    pub narrative_text: String,
    pub resource_entry_count: usize,
}

/// Lý do bundle bị từ chối.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidBundle {
    #[error("must be an object")]
    NotAnObject,
    #[error("resourceType must be \"Bundle\"")]
    NotABundle,
    #[error("type is required")]
    MissingType,
}

impl InvalidBundle {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotAnObject => "must be an object",
            Self::NotABundle => "resourceType must be \"Bundle\"",
            Self::MissingType => "type is required",
        }
    }
}

/// Lỗi chung của pipeline.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("Invalid bundle: {0}")]
    InvalidBundle(#[from] InvalidBundle),
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Lỗi mô hình tóm tắt: {0}")]
    Summarizer(String),
}

/// Kênh quan sát tách khỏi logic phân loại và dựng văn bản.
pub trait BundleObserver {
    fn bundle_accepted(&self, bundle_type: &BundleType, entry_count: usize);
    fn bundle_rejected(&self, reason: &InvalidBundle);
}

/// Ghi log qua `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BundleObserver for TracingObserver {
    fn bundle_accepted(&self, bundle_type: &BundleType, entry_count: usize) {
        info!(
            bundle_type = bundle_type.as_str(),
            entry_count, "Processing FHIR bundle"
        );
    }

    fn bundle_rejected(&self, reason: &InvalidBundle) {
        warn!(reason = reason.reason(), "Rejected FHIR bundle");
    }
}

/// Bỏ qua mọi sự kiện (dùng cho test).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BundleObserver for NoopObserver {
    fn bundle_accepted(&self, _bundle_type: &BundleType, _entry_count: usize) {}

    fn bundle_rejected(&self, _reason: &InvalidBundle) {}
}

/// Cấu hình cho bước gọi mô hình tóm tắt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Chỉ dẫn hệ thống gửi kèm mọi yêu cầu.
    pub system_prompt: String,
    /// Số ký tự tối đa giữ lại từ gợi ý trọng tâm của người gọi.
    pub max_focus_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            system_prompt: "You are a clinical documentation assistant. Summarize the provided \
                            patient records accurately and concisely. Do not invent findings \
                            that are not present in the records."
                .to_string(),
            max_focus_chars: 500,
        }
    }
}

/// Yêu cầu tóm tắt: văn bản tường thuật và gợi ý trọng tâm đã chuẩn hóa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryRequest {
    pub narrative: NarrativeOutput,
    pub focus: Option<String>,
}

impl SummaryRequest {
    pub fn new(narrative: NarrativeOutput, focus: Option<&str>, config: &SummaryConfig) -> Self {
        let focus = focus
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .map(|hint| hint.chars().take(config.max_focus_chars).collect::<String>())
            .filter(|hint| !hint.is_empty());

        Self { narrative, focus }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub system: String,
    pub user: String,
}

/// Bản tóm tắt trả về cho người gọi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalSummary {
    pub summary: String,
    pub resource_entry_count: usize,
}

/// Điểm nối tới dịch vụ sinh văn bản bên ngoài.
pub trait Summarizer {
    fn summarize(
        &self,
        prompt: &SummaryPrompt,
        config: &SummaryConfig,
    ) -> Result<String, NarrativeError>;
}

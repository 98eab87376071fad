//! Read-only lender catalog: which lenders offer which loan types, and on what terms.
//!
//! The catalog is built once (from the built-in table or a CSV export) and shared behind an
//! `Arc` by every conversation; nothing mutates it after construction.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Loan products the portal knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanTypeId {
    Home,
    Auto,
    Personal,
    Education,
    Business,
    Gadget,
}

impl LoanTypeId {
    pub const ALL: [LoanTypeId; 6] = [
        LoanTypeId::Home,
        LoanTypeId::Auto,
        LoanTypeId::Personal,
        LoanTypeId::Education,
        LoanTypeId::Business,
        LoanTypeId::Gadget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanTypeId::Home => "home",
            LoanTypeId::Auto => "auto",
            LoanTypeId::Personal => "personal",
            LoanTypeId::Education => "education",
            LoanTypeId::Business => "business",
            LoanTypeId::Gadget => "gadget",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanTypeId::Home => "Home Loan",
            LoanTypeId::Auto => "Auto Loan",
            LoanTypeId::Personal => "Personal Loan",
            LoanTypeId::Education => "Education Loan",
            LoanTypeId::Business => "Business Loan",
            LoanTypeId::Gadget => "Gadget Loan",
        }
    }

    /// Extra phrases that name the product in conversation.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            LoanTypeId::Home => &["housing loan", "mortgage"],
            LoanTypeId::Auto => &["car loan", "vehicle loan"],
            LoanTypeId::Personal => &[],
            LoanTypeId::Education => &["student loan", "study loan"],
            LoanTypeId::Business => &["msme loan"],
            LoanTypeId::Gadget => &["consumer durable loan"],
        }
    }

    /// Exact, case-insensitive match on the identifier.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
    }

    /// Case-insensitive substring match on the id, label or an alias.
    pub fn find_in(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        Self::ALL.into_iter().find(|kind| {
            lowered.contains(kind.as_str())
                || lowered.contains(&kind.label().to_lowercase())
                || kind.aliases().iter().any(|alias| lowered.contains(alias))
        })
    }
}

/// Regulatory grouping shown next to a lender's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LenderCategory {
    PublicSector,
    PrivateSector,
    SmallFinanceBank,
    ForeignBank,
    Nbfc,
}

/// One lender's terms for one loan type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderLoanOffer {
    pub loan_type: LoanTypeId,
    pub annual_rate_percent: f64,
    pub max_tenure_years: u32,
    /// Zero means the lender does not set a minimum.
    pub min_credit_score: u16,
}

impl LenderLoanOffer {
    pub fn new(
        loan_type: LoanTypeId,
        annual_rate_percent: f64,
        max_tenure_years: u32,
        min_credit_score: u16,
    ) -> Self {
        Self {
            loan_type,
            annual_rate_percent,
            max_tenure_years,
            min_credit_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lender {
    pub id: String,
    pub name: String,
    pub category: LenderCategory,
    pub application_url: String,
    #[serde(default)]
    pub highlight: String,
    pub offers: Vec<LenderLoanOffer>,
}

impl Lender {
    pub fn offer(&self, loan_type: LoanTypeId) -> Option<&LenderLoanOffer> {
        self.offers.iter().find(|offer| offer.loan_type == loan_type)
    }

    /// Whether free text refers to this lender by id or full name.
    pub fn is_mentioned_in(&self, normalized: &str) -> bool {
        normalized.contains(&self.name.to_lowercase())
            || normalized
                .split(|c: char| !c.is_alphanumeric() && c != '-')
                .any(|word| word == self.id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read lender catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lender catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("lender '{lender_id}' lists more than one {loan_type:?} offer")]
    DuplicateOffer {
        lender_id: String,
        loan_type: LoanTypeId,
    },
    #[error("unknown loan type '{0}'")]
    UnknownLoanType(String),
    #[error("invalid offer for lender '{lender_id}': {detail}")]
    InvalidOffer { lender_id: String, detail: String },
}

/// Immutable, ordered set of lenders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LenderCatalog {
    lenders: Vec<Lender>,
}

impl LenderCatalog {
    /// Validates offers and the one-offer-per-(lender, loan type) rule.
    pub fn new(lenders: Vec<Lender>) -> Result<Self, CatalogError> {
        for lender in &lenders {
            let mut seen = HashSet::new();
            for offer in &lender.offers {
                if !seen.insert(offer.loan_type) {
                    return Err(CatalogError::DuplicateOffer {
                        lender_id: lender.id.clone(),
                        loan_type: offer.loan_type,
                    });
                }
                if !offer.annual_rate_percent.is_finite() || offer.annual_rate_percent < 0.0 {
                    return Err(CatalogError::InvalidOffer {
                        lender_id: lender.id.clone(),
                        detail: format!(
                            "annual rate {} must be a non-negative number",
                            offer.annual_rate_percent
                        ),
                    });
                }
                if offer.max_tenure_years == 0 {
                    return Err(CatalogError::InvalidOffer {
                        lender_id: lender.id.clone(),
                        detail: "maximum tenure must be at least one year".to_string(),
                    });
                }
            }
        }

        Ok(Self { lenders })
    }

    /// Built-in catalog used when no CSV override is configured.
    pub fn standard() -> Self {
        use LoanTypeId::*;

        let lenders = vec![
            Lender {
                id: "apex".to_string(),
                name: "Apex Financial".to_string(),
                category: LenderCategory::PrivateSector,
                application_url: "https://apexfinancial.example/apply".to_string(),
                highlight: "Lowest home loan rate for strong credit profiles".to_string(),
                offers: vec![
                    LenderLoanOffer::new(Home, 6.5, 30, 700),
                    LenderLoanOffer::new(Auto, 8.2, 7, 650),
                    LenderLoanOffer::new(Personal, 11.5, 5, 600),
                    LenderLoanOffer::new(Education, 7.0, 15, 0),
                    LenderLoanOffer::new(Business, 10.5, 10, 700),
                    LenderLoanOffer::new(Gadget, 12.0, 2, 0),
                ],
            },
            Lender {
                id: "horizon".to_string(),
                name: "Horizon Trust".to_string(),
                category: LenderCategory::PublicSector,
                application_url: "https://horizontrust.example/loans".to_string(),
                highlight: "0% EMI scheme on gadgets and relaxed credit thresholds".to_string(),
                offers: vec![
                    LenderLoanOffer::new(Home, 6.8, 25, 650),
                    LenderLoanOffer::new(Auto, 7.9, 8, 680),
                    LenderLoanOffer::new(Personal, 10.9, 6, 620),
                    LenderLoanOffer::new(Education, 6.8, 12, 0),
                    LenderLoanOffer::new(Business, 11.0, 7, 650),
                    LenderLoanOffer::new(Gadget, 0.0, 1, 0),
                ],
            },
            Lender {
                id: "summit".to_string(),
                name: "Summit Credit Union".to_string(),
                category: LenderCategory::SmallFinanceBank,
                application_url: "https://summitcu.example/apply".to_string(),
                highlight: "Member-owned lender focused on homes and education".to_string(),
                offers: vec![
                    LenderLoanOffer::new(Home, 6.6, 25, 680),
                    LenderLoanOffer::new(Personal, 11.2, 5, 650),
                    LenderLoanOffer::new(Education, 7.2, 10, 0),
                ],
            },
        ];

        Self { lenders }
    }

    pub fn lenders(&self) -> &[Lender] {
        &self.lenders
    }

    pub fn lender(&self, id: &str) -> Option<&Lender> {
        self.lenders.iter().find(|lender| lender.id == id)
    }

    /// Lenders offering `loan_type`, in catalog order.
    pub fn offers_for(
        &self,
        loan_type: LoanTypeId,
    ) -> impl Iterator<Item = (&Lender, &LenderLoanOffer)> + '_ {
        self.lenders
            .iter()
            .filter_map(move |lender| lender.offer(loan_type).map(|offer| (lender, offer)))
    }

    /// First lender named in already-normalized text.
    pub fn mentioned_lender(&self, normalized: &str) -> Option<&Lender> {
        self.lenders
            .iter()
            .find(|lender| lender.is_mentioned_in(normalized))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a flattened catalog export; rows sharing a `lender_id` are grouped in first-seen order.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut lenders: Vec<Lender> = Vec::new();

        for record in csv_reader.deserialize::<CatalogRow>() {
            let row = record?;
            let loan_type = LoanTypeId::parse(&row.loan_type)
                .ok_or_else(|| CatalogError::UnknownLoanType(row.loan_type.clone()))?;
            let offer = LenderLoanOffer::new(
                loan_type,
                row.annual_rate_percent,
                row.max_tenure_years,
                row.min_credit_score,
            );

            match lenders.iter_mut().find(|lender| lender.id == row.lender_id) {
                Some(lender) => lender.offers.push(offer),
                None => lenders.push(Lender {
                    id: row.lender_id,
                    name: row.lender_name,
                    category: row.category,
                    application_url: row.application_url,
                    highlight: row.highlight.unwrap_or_default(),
                    offers: vec![offer],
                }),
            }
        }

        Self::new(lenders)
    }

    /// Write one row per offer, in catalog order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), CatalogError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for lender in &self.lenders {
            for offer in &lender.offers {
                csv_writer.serialize(CatalogRow {
                    lender_id: lender.id.clone(),
                    lender_name: lender.name.clone(),
                    category: lender.category,
                    application_url: lender.application_url.clone(),
                    loan_type: offer.loan_type.as_str().to_string(),
                    annual_rate_percent: offer.annual_rate_percent,
                    max_tenure_years: offer.max_tenure_years,
                    min_credit_score: offer.min_credit_score,
                    highlight: Some(lender.highlight.clone()).filter(|text| !text.is_empty()),
                })?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogRow {
    lender_id: String,
    lender_name: String,
    category: LenderCategory,
    application_url: String,
    loan_type: String,
    annual_rate_percent: f64,
    max_tenure_years: u32,
    #[serde(default)]
    min_credit_score: u16,
    #[serde(default)]
    highlight: Option<String>,
}

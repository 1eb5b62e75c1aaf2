//! The fraud activity types offered for resource lookup.

use serde::Serialize;
use taxomap_core::vocab;

/// A selectable fraud activity: display label and class local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FraudActivity {
    pub label: &'static str,
    pub local_name: &'static str,
}

impl FraudActivity {
    const fn new(label: &'static str, local_name: &'static str) -> Self {
        Self { label, local_name }
    }

    /// Full class IRI under `namespace`.
    pub fn iri(&self, namespace: &str) -> String {
        vocab::expand(namespace, self.local_name)
    }
}

/// Catalog ordered by display label. Local names follow the ontology, including
/// its irregular spellings.
pub const CATALOG: [FraudActivity; 36] = [
    FraudActivity::new("Beneficiary fraud", "BeneficiaryFraud"),
    FraudActivity::new("Cellphone fraud", "CellphoneFraud"),
    FraudActivity::new("Charity fraud", "CharityFraud"),
    FraudActivity::new("Confidence fraud", "ConfidenceFraud"),
    FraudActivity::new("Consumer fraud", "ConsumerFraud"),
    FraudActivity::new("Corporate fraud", "CorporateFraud"),
    FraudActivity::new("Corruption", "Corruption"),
    FraudActivity::new("Cyber espionage", "CyberEspionage"),
    FraudActivity::new("Cyberextortion", "Cyberextortion"),
    FraudActivity::new("Environmental fraud", "EnvironmentalFraud"),
    FraudActivity::new("Federal contract fraud", "ContractFraud"),
    FraudActivity::new("Financial institution fraud", "FinancialInstitutionFraud"),
    FraudActivity::new(
        "Government furnished equipment fraud",
        "GovernmentFurnishedEquipmentFraud",
    ),
    FraudActivity::new("Grant fraud", "GrantFraud"),
    FraudActivity::new("Healthcare fraud", "HealthcareFraud"),
    FraudActivity::new("Housing fraud", "HousingFraud"),
    FraudActivity::new("Identity fraud", "IdentityFraud"),
    FraudActivity::new("Insurance fraud", "InsuranceFraud"),
    FraudActivity::new("Investment fraud", "InvestmentFraud"),
    FraudActivity::new("Laboratory fraud", "LaboratoryFraud"),
    FraudActivity::new("Lien filing fraud", "LienFillingFraud"),
    FraudActivity::new("Loan fraud", "LoanFraud"),
    FraudActivity::new("Mail fraud", "MailFraud"),
    FraudActivity::new("Media manipulation", "MediaManipulation"),
    FraudActivity::new("Payment fraud", "PaymentFraud"),
    FraudActivity::new("Procurement fraud", "ProcurementFraud"),
    FraudActivity::new("Public assistance fraud", "AssistanceFraud"),
    FraudActivity::new("Public emergency fraud", "public_emergency_fraud"),
    FraudActivity::new("Sanction evasion fraud", "SanctionEvasion"),
    FraudActivity::new("Student financial aid fraud", "StudentFinancialAidFraud"),
    FraudActivity::new("Supervised release", "supervised_release"),
    FraudActivity::new("Tax fraud", "TaxFraud"),
    FraudActivity::new("Trafficking", "Trafficking"),
    FraudActivity::new("Visa fraud", "VisaFraud"),
    FraudActivity::new("Wire fraud", "WireFraud"),
    FraudActivity::new("Workplace fraud", "WorkplaceFraud"),
];

/// Look up an activity by display label (case-insensitive) or local name.
pub fn find(query: &str) -> Option<&'static FraudActivity> {
    let query = query.trim();
    CATALOG
        .iter()
        .find(|a| a.label.eq_ignore_ascii_case(query))
        .or_else(|| CATALOG.iter().find(|a| a.local_name == query))
        .or_else(|| {
            CATALOG
                .iter()
                .find(|a| a.local_name.eq_ignore_ascii_case(query))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_unique_and_sorted() {
        let labels: HashSet<&str> = CATALOG.iter().map(|a| a.label).collect();
        let names: HashSet<&str> = CATALOG.iter().map(|a| a.local_name).collect();
        assert_eq!(labels.len(), CATALOG.len());
        assert_eq!(names.len(), CATALOG.len());
        assert!(CATALOG.windows(2).all(|w| w[0].label < w[1].label));
    }

    #[test]
    fn test_find_by_label_and_local_name() {
        assert_eq!(find("grant FRAUD").unwrap().local_name, "GrantFraud");
        assert_eq!(find("ContractFraud").unwrap().label, "Federal contract fraud");
        assert_eq!(
            find("Lien filing fraud").unwrap().local_name,
            "LienFillingFraud"
        );
        assert_eq!(
            find("public_emergency_fraud").unwrap().label,
            "Public emergency fraud"
        );
        assert!(find("Parking fraud").is_none());
    }

    #[test]
    fn test_iri_expansion() {
        let grant = find("Grant fraud").unwrap();
        assert_eq!(
            grant.iri(vocab::GFO_NAMESPACE),
            format!("{}GrantFraud", vocab::GFO_NAMESPACE)
        );
    }
}

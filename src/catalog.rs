//! Static DeFi project catalog served on `/`
//!
//! The payload is fixed at build time. It is rendered to JSON once when the
//! application context is built and the same bytes are returned on every
//! request.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Top-level envelope returned by `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub status: i32,
    pub message: String,
    pub data: CatalogData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    pub n_projects: u32,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "DEX")]
    Dex,
    Farm,
    Stablecoin,
    Lending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub caption: String,
    pub link: String,
}

/// One yield-farming project entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: u32,
    pub project_name: String,
    pub project_type: ProjectType,
    pub compound: bool,
    pub token1_name: String,
    pub token2_name: Option<String>,
    pub token_item_caption: String,
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Kept as a string so trailing zeros survive serialization
    pub interest_rate: String,
    pub tvl: f64,
    #[serde(flatten)]
    pub incentives: Incentives,
}

/// Reward token paid on top of the base rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incentive {
    pub token_name: String,
    pub amount: String,
}

/// Incentive tokens, exposed on the wire as two parallel lists
///
/// Holding pairs keeps the name and amount lists the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Incentives(pub Vec<Incentive>);

impl Incentives {
    pub fn token_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|i| i.token_name.as_str())
    }

    pub fn amounts(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|i| i.amount.as_str())
    }
}

impl Serialize for Incentives {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let names: Vec<&str> = self.token_names().collect();
        let amounts: Vec<&str> = self.amounts().collect();

        let mut state = serializer.serialize_struct("Incentives", 2)?;
        state.serialize_field("incentiveTokenNames", &names)?;
        state.serialize_field("incentiveTokenAmounts", &amounts)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Incentives {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire {
            incentive_token_names: Vec<String>,
            incentive_token_amounts: Vec<String>,
        }

        let wire = Wire::deserialize(deserializer)?;
        if wire.incentive_token_names.len() != wire.incentive_token_amounts.len() {
            return Err(serde::de::Error::custom(format!(
                "incentive lists differ in length: {} names, {} amounts",
                wire.incentive_token_names.len(),
                wire.incentive_token_amounts.len()
            )));
        }

        Ok(Incentives(
            wire.incentive_token_names
                .into_iter()
                .zip(wire.incentive_token_amounts)
                .map(|(token_name, amount)| Incentive { token_name, amount })
                .collect(),
        ))
    }
}

impl CatalogResponse {
    /// The catalog shipped with the service
    ///
    /// `nProjects` is part of the fixed payload and is not derived from the
    /// project list.
    pub fn builtin() -> Self {
        Self {
            status: 0,
            message: "OK".to_string(),
            data: CatalogData {
                n_projects: 6,
                projects: vec![
                    Project {
                        project_id: 1,
                        project_name: "Curve".into(),
                        project_type: ProjectType::Dex,
                        compound: false,
                        token1_name: "xcDOT".into(),
                        token2_name: Some("nDOT".into()),
                        token_item_caption: "xcDOT-nDOT".into(),
                        buttons: liquidity_buttons(),
                        is_active: Some(true),
                        interest_rate: "10.02".into(),
                        tvl: 2716787.9047005186,
                        incentives: Incentives::default(),
                    },
                    Project {
                        project_id: 2,
                        project_name: "Beefy".into(),
                        project_type: ProjectType::Farm,
                        compound: true,
                        token1_name: "xcDOT-nDOT".into(),
                        token2_name: None,
                        token_item_caption: "Curve xcDOT-nDOT".into(),
                        buttons: vec![button("Deposit")],
                        is_active: Some(true),
                        interest_rate: "10.02".into(),
                        tvl: 244272.76985017065,
                        incentives: Incentives::default(),
                    },
                    Project {
                        project_id: 3,
                        project_name: "StellaSwap".into(),
                        project_type: ProjectType::Dex,
                        compound: false,
                        token1_name: "xcDOT".into(),
                        token2_name: Some("nDOT".into()),
                        token_item_caption: "xcDOT-nDOT".into(),
                        buttons: liquidity_buttons(),
                        is_active: Some(true),
                        interest_rate: "10.85".into(),
                        tvl: 1122113.1822753097,
                        incentives: incentives(&[("STELLA", "3163.63"), ("WGLMR", "52.80")]),
                    },
                    Project {
                        project_id: 4,
                        project_name: "BeamSwap".into(),
                        project_type: ProjectType::Dex,
                        compound: false,
                        token1_name: "xcDOT".into(),
                        token2_name: Some("nDOT".into()),
                        token_item_caption: "xcDOT-nDOT".into(),
                        buttons: liquidity_buttons(),
                        is_active: None,
                        interest_rate: "4.13".into(),
                        tvl: 392187.6527884675,
                        incentives: incentives(&[("GLINT", "36720.00")]),
                    },
                    Project {
                        project_id: 5,
                        project_name: "Beefy".into(),
                        project_type: ProjectType::Farm,
                        compound: true,
                        token1_name: "xcDOT-nDOT".into(),
                        token2_name: None,
                        token_item_caption: "StellaSwap xcDOT-nDOT".into(),
                        buttons: vec![button("Deposit")],
                        is_active: Some(true),
                        interest_rate: "7.86".into(),
                        tvl: 450980.70845176966,
                        incentives: Incentives::default(),
                    },
                    Project {
                        project_id: 6,
                        project_name: "Beefy".into(),
                        project_type: ProjectType::Farm,
                        compound: true,
                        token1_name: "xcDOT-nDOT".into(),
                        token2_name: None,
                        token_item_caption: "Beamswap xcDOT-nDOT".into(),
                        buttons: vec![button("Deposit")],
                        is_active: Some(true),
                        interest_rate: "3.67".into(),
                        tvl: 244683.4556736184,
                        incentives: Incentives::default(),
                    },
                    Project {
                        project_id: 7,
                        project_name: "MAI".into(),
                        project_type: ProjectType::Stablecoin,
                        compound: true,
                        token1_name: "nDOT".into(),
                        token2_name: None,
                        token_item_caption: "MAI".into(),
                        buttons: vec![button("Create vault")],
                        is_active: Some(true),
                        interest_rate: "12.3".into(),
                        tvl: 123456.123456,
                        incentives: Incentives::default(),
                    },
                    Project {
                        project_id: 8,
                        project_name: "Moonwell".into(),
                        project_type: ProjectType::Lending,
                        compound: true,
                        token1_name: "nDOT".into(),
                        token2_name: None,
                        token_item_caption: "mnDOT".into(),
                        buttons: vec![button("Deposit")],
                        is_active: Some(true),
                        interest_rate: "12.3".into(),
                        tvl: 123456.123456,
                        incentives: Incentives::default(),
                    },
                ],
            },
        }
    }

    /// Serialize to the JSON body served over HTTP
    pub fn render(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

fn button(caption: &str) -> Button {
    Button {
        caption: caption.to_string(),
        link: "#".to_string(),
    }
}

fn liquidity_buttons() -> Vec<Button> {
    vec![button("Add liquidity"), button("Swap")]
}

fn incentives(pairs: &[(&str, &str)]) -> Incentives {
    Incentives(
        pairs
            .iter()
            .map(|(name, amount)| Incentive {
                token_name: name.to_string(),
                amount: amount.to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

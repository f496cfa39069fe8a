use serde::{Deserialize, Serialize};

/// Path the signup flow continues to once the mandatory terms are accepted
pub const SIGNUP_DETAILS_PATH: &str = "/signup/details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TermsId {
    Service,
    Privacy,
    ThirdParty,
    Payment,
    Marketing,
}

impl TermsId {
    pub const ALL: [TermsId; 5] = [
        TermsId::Service,
        TermsId::Privacy,
        TermsId::ThirdParty,
        TermsId::Payment,
        TermsId::Marketing,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "service" => Some(TermsId::Service),
            "privacy" => Some(TermsId::Privacy),
            "thirdParty" => Some(TermsId::ThirdParty),
            "payment" => Some(TermsId::Payment),
            "marketing" => Some(TermsId::Marketing),
            _ => None,
        }
    }

    pub fn required(self) -> bool {
        !matches!(self, TermsId::Marketing)
    }

    pub fn title(self) -> &'static str {
        match self {
            TermsId::Service => "(필수) 서비스 이용약관 동의",
            TermsId::Privacy => "(필수) 개인정보 수집 및 이용 동의",
            TermsId::ThirdParty => "(필수) 개인정보 제3자 제공 동의",
            TermsId::Payment => "(필수) 결제 서비스 이용약관",
            TermsId::Marketing => "(선택) 광고성 정보 수신 전체 동의",
        }
    }
}

/// Checked state of each term on the signup terms screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsAgreement {
    pub service: bool,
    pub privacy: bool,
    pub third_party: bool,
    pub payment: bool,
    pub marketing: bool,
}

impl TermsAgreement {
    pub fn is_checked(&self, id: TermsId) -> bool {
        match id {
            TermsId::Service => self.service,
            TermsId::Privacy => self.privacy,
            TermsId::ThirdParty => self.third_party,
            TermsId::Payment => self.payment,
            TermsId::Marketing => self.marketing,
        }
    }

    pub fn set(&mut self, id: TermsId, checked: bool) {
        let slot = match id {
            TermsId::Service => &mut self.service,
            TermsId::Privacy => &mut self.privacy,
            TermsId::ThirdParty => &mut self.third_party,
            TermsId::Payment => &mut self.payment,
            TermsId::Marketing => &mut self.marketing,
        };
        *slot = checked;
    }

    /// Flip a single term by its wire id; unknown ids are ignored
    pub fn toggle(&mut self, id: &str) {
        if let Some(id) = TermsId::from_id(id) {
            let checked = self.is_checked(id);
            self.set(id, !checked);
        }
    }

    pub fn all_agreed(&self) -> bool {
        TermsId::ALL.iter().all(|id| self.is_checked(*id))
    }

    pub fn all_required_agreed(&self) -> bool {
        TermsId::ALL
            .iter()
            .filter(|id| id.required())
            .all(|id| self.is_checked(*id))
    }

    /// "Agree to all": clears everything when all are checked, otherwise checks everything
    pub fn toggle_all(&mut self) {
        let checked = !self.all_agreed();
        for id in TermsId::ALL {
            self.set(id, checked);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn next_path(&self) -> Option<&'static str> {
        self.all_required_agreed().then_some(SIGNUP_DETAILS_PATH)
    }
}

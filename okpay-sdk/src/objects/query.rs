use super::account::AccountName;
use super::currency::CurrencyInfo;
use url::Url;

/// Parameters a payment page link can prefill.
///
/// `vendor` and `to` both name the recipient; when both are present `to`
/// wins. The amount is kept as entered and interpreted in whichever currency
/// mode is active. Unknown currency codes are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentQuery {
    pub recipient: Option<AccountName>,
    pub amount: Option<String>,
    pub currency: Option<&'static CurrencyInfo>,
}

impl PaymentQuery {
    pub fn from_url(url: &Url) -> Self {
        let mut query = Self::default();
        let mut vendor = None;
        let mut to = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "vendor" if !value.is_empty() => vendor = Some(AccountName::sanitize(&value)),
                "to" if !value.is_empty() => to = Some(AccountName::sanitize(&value)),
                "amount" if !value.trim().is_empty() => query.amount = Some(value.trim().to_owned()),
                "cur" => query.currency = CurrencyInfo::lookup(&value),
                _ => {}
            }
        }
        query.recipient = to.or(vendor);
        query
    }
}

/// Link to the payment page with the recipient prefilled, suitable for
/// encoding into a scannable code.
pub fn payment_page_url(page: &Url, recipient: &AccountName) -> Url {
    let mut url = page.clone();
    if !recipient.is_empty() {
        url.query_pairs_mut().append_pair("vendor", recipient.as_str());
    }
    url
}

mod money;
#[cfg(test)]
mod tests;

pub use money::Money;

pub type MemberId = String;
pub type PaymentId = String;

use crate::constraints::{delegate_constraint, ExtraKeysConstraint, SymbolKeysConstraint, TypeConstraint};
use crate::contract::{Contract, DefinitionOptions};
use crate::kind::ValueKind;
use crate::registry::{TypeRef, BLOCK_TYPE};

/// The keys of a projected call.
pub const SIGNATURE_KEYS: [&str; 3] = ["arguments", "keywords", "block"];

/// Checks the overall shape of a projected call.
///
/// The value must be an object with exactly the keys `arguments` (an array),
/// `keywords` (an object keyed by keyword names) and `block` (the block flag
/// or `null`). [`ParametersContract`](crate::ParametersContract) uses this as
/// its sanity check.
#[derive(Debug, Clone)]
pub struct SignatureContract {
    contract: Contract,
}

impl SignatureContract {
    pub fn new() -> Self {
        let contract = Contract::new();
        contract
            .add_sanity_constraint(TypeConstraint::new(ValueKind::Object))
            .add_constraint(ExtraKeysConstraint::new(SIGNATURE_KEYS))
            .add_unchecked(
                TypeConstraint::new(ValueKind::Array),
                DefinitionOptions::new().key("arguments"),
            )
            .add_unchecked(
                TypeConstraint::new(ValueKind::Object),
                DefinitionOptions::new().key("keywords"),
            )
            .add_unchecked(SymbolKeysConstraint, DefinitionOptions::new().key("keywords"))
            .add_unchecked(
                TypeConstraint::new(TypeRef::named(BLOCK_TYPE)).optional(),
                DefinitionOptions::new().key("block"),
            );
        Self { contract }
    }

    /// Returns the underlying contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }
}

impl Default for SignatureContract {
    fn default() -> Self {
        Self::new()
    }
}

delegate_constraint!(SignatureContract => contract);

//! ABI bindings for the contracts the engine reads from and writes to.

use alloy::sol;

sol! {
    /// Multicall3 aggregate with per-call failure tolerance.
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Result[] memory returnData);
    }
}

sol! {
    /// Representative-signed authorization passed to the delegation ledger.
    struct EcdsaSignature {
        uint8 v;
        bytes32 r;
        bytes32 s;
    }

    interface IProposerRegistry {
        struct ProposerInfo {
            uint8 status;
            address representative;
            address payoutRecipient;
        }

        function getProposer(bytes calldata blsPublicKey) external view returns (ProposerInfo memory info);

        function batchRegisterProposers(
            bytes[] calldata blsPublicKeys,
            address[] calldata payoutRecipients,
            uint64[] calldata gasLimits,
            uint64[] calldata timestamps,
            bytes[] calldata blsSignatures
        ) external;
    }

    interface INativeDelegationLedger {
        struct NativeDelegationInfo {
            address representative;
            address payoutRecipient;
            uint8 status;
        }

        function getNativeDelegation(bytes calldata blsPublicKey) external view returns (NativeDelegationInfo memory info);

        function batchNativeDelegate(
            bytes[] calldata blsPublicKeys,
            address[] calldata payoutRecipients,
            EcdsaSignature[] calldata representativeSignatures,
            bool[] calldata registeredInSameBatch
        ) external;

        function claimNativeDelegation(bytes calldata blsPublicKey, uint256 reportedBalance, EcdsaSignature calldata signature) external;

        function exitNativeDelegation(bytes calldata blsPublicKey, uint256 reportedBalance, EcdsaSignature calldata signature) external;
    }
}

impl From<crate::foundation::EcdsaSignature> for EcdsaSignature {
    fn from(sig: crate::foundation::EcdsaSignature) -> Self {
        Self { v: sig.v, r: sig.r, s: sig.s }
    }
}

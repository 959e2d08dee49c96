//! Tindung HTTP client implementation.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use tindung_core::{
    ContractCode, HistoryId, HistoryPatch, HistoryRecord, Loan, LoanKind, NewHistoryRecord,
    PaymentStatus, ScheduleSummary,
};

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, ApiResponse, CountResponse, HealthStatus};

/// Options for building a [`CreditClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

/// Page selection for list calls.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Page {
    /// Records to skip.
    pub skip: usize,
    /// Maximum records to return; the server default applies when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct StatusQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<PaymentStatus>,
}

#[derive(Serialize)]
struct ContractQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    contract_code: Option<&'a str>,
}

/// Tindung API client.
///
/// Contract methods are generic over the product:
///
/// ```no_run
/// use tindung_client::CreditClient;
/// use tindung_core::{CreditLoan, InstallmentLoan};
///
/// # async fn example() -> Result<(), tindung_client::ClientError> {
/// let client = CreditClient::new("http://localhost:8080")?;
/// let credit = client.list_loans::<CreditLoan>(Default::default()).await?;
/// let installments = client.count_loans::<InstallmentLoan>(None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CreditClient {
    client: Client,
    base_url: Url,
}

fn product_path(kind: LoanKind) -> &'static str {
    match kind {
        LoanKind::Credit => "credit-loans",
        LoanKind::Installment => "installment-loans",
    }
}

impl CreditClient {
    /// Create a client with default options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if `base_url` is not an absolute
    /// HTTP URL or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if `base_url` is not an absolute
    /// HTTP URL or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base URL {base_url}: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Configuration(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn loan_url<L: Loan>(&self, code: Option<&ContractCode>) -> Result<Url, ClientError> {
        let product = product_path(L::KIND);
        match code {
            Some(code) => self.url(&["v1", product, code.as_str()]),
            None => self.url(&["v1", product]),
        }
    }

    fn history_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut path = vec!["v1", "history"];
        path.extend_from_slice(segments);
        self.url(&path)
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.client.get(self.url(&["health"])?).send().await?;
        Self::handle_response(response).await
    }

    // =========================================================================
    // Contracts
    // =========================================================================

    /// Create a contract of product `L`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidArgument` for a rejected draft.
    pub async fn create_loan<L: Loan>(&self, draft: &L::Draft) -> Result<L, ClientError> {
        self.send(self.client.post(self.loan_url::<L>(None)?).json(draft))
            .await
    }

    /// Get a contract by code.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the code is unknown for `L`.
    pub async fn get_loan<L: Loan>(&self, code: &ContractCode) -> Result<L, ClientError> {
        self.send(self.client.get(self.loan_url::<L>(Some(code))?))
            .await
    }

    /// List contracts in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_loans<L: Loan>(&self, page: Page) -> Result<Vec<L>, ClientError> {
        self.send(self.client.get(self.loan_url::<L>(None)?).query(&page))
            .await
    }

    /// List contracts with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_loans_by_status<L: Loan>(
        &self,
        status: PaymentStatus,
    ) -> Result<Vec<L>, ClientError> {
        let query = StatusQuery {
            status: Some(status),
        };
        self.send(self.client.get(self.loan_url::<L>(None)?).query(&query))
            .await
    }

    /// Count contracts, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn count_loans<L: Loan>(
        &self,
        status: Option<PaymentStatus>,
    ) -> Result<usize, ClientError> {
        let response: CountResponse = self
            .send(
                self.client
                    .get(self.url(&["v1", product_path(L::KIND), "count"])?)
                    .query(&StatusQuery { status }),
            )
            .await?;
        Ok(response.count)
    }

    /// Merge a partial update into a contract.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown code and
    /// `ClientError::InvalidArgument` for a rejected patch.
    pub async fn update_loan<L: Loan>(
        &self,
        code: &ContractCode,
        patch: &L::Patch,
    ) -> Result<L, ClientError> {
        self.send(
            self.client
                .put(self.loan_url::<L>(Some(code))?)
                .json(patch),
        )
        .await
    }

    /// Delete a contract.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the code is unknown for `L`.
    pub async fn delete_loan<L: Loan>(&self, code: &ContractCode) -> Result<(), ClientError> {
        self.send(self.client.delete(self.loan_url::<L>(Some(code))?))
            .await
    }

    // =========================================================================
    // Payment history
    // =========================================================================

    /// Record one payment entry.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the contract does not exist.
    pub async fn create_history(
        &self,
        record: &NewHistoryRecord,
    ) -> Result<HistoryRecord, ClientError> {
        self.send(self.client.post(self.history_url(&[])?).json(record))
            .await
    }

    /// Get a history record by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    pub async fn get_history(&self, id: HistoryId) -> Result<HistoryRecord, ClientError> {
        let id = id.to_string();
        self.send(self.client.get(self.history_url(&[id.as_str()])?))
            .await
    }

    /// List history records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_history(&self, page: Page) -> Result<Vec<HistoryRecord>, ClientError> {
        self.send(self.client.get(self.history_url(&[])?).query(&page))
            .await
    }

    /// All history records of one contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn contract_history(
        &self,
        code: &ContractCode,
    ) -> Result<Vec<HistoryRecord>, ClientError> {
        self.send(
            self.client
                .get(self.history_url(&["contract", code.as_str()])?),
        )
        .await
    }

    /// Count history records, optionally only those of one contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn count_history(&self, code: Option<&ContractCode>) -> Result<usize, ClientError> {
        let query = ContractQuery {
            contract_code: code.map(ContractCode::as_str),
        };
        let response: CountResponse = self
            .send(self.client.get(self.history_url(&["count"])?).query(&query))
            .await?;
        Ok(response.count)
    }

    /// Merge a partial update into a history record.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id and
    /// `ClientError::InvalidArgument` for a rejected patch.
    pub async fn update_history(
        &self,
        id: HistoryId,
        patch: &HistoryPatch,
    ) -> Result<HistoryRecord, ClientError> {
        let id = id.to_string();
        self.send(self.client.put(self.history_url(&[id.as_str()])?).json(patch))
            .await
    }

    /// Delete a history record.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for an unknown id.
    pub async fn delete_history(&self, id: HistoryId) -> Result<(), ClientError> {
        let id = id.to_string();
        self.send(self.client.delete(self.history_url(&[id.as_str()])?))
            .await
    }

    /// Run the schedule generator for a contract.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidArgument` for an unrecognised code prefix
    /// and `ClientError::NotFound` for an unknown contract.
    pub async fn generate_schedule(
        &self,
        code: &ContractCode,
    ) -> Result<ScheduleSummary, ClientError> {
        self.send(
            self.client
                .post(self.history_url(&["generate", code.as_str()])?),
        )
        .await
    }

    // =========================================================================
    // Response handling
    // =========================================================================

    /// Send a request and unwrap the success envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let envelope: ApiResponse<T> = Self::handle_response(response).await?;
        tracing::debug!(message = %envelope.message, "Request succeeded");
        Ok(envelope.data)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        match serde_json::from_slice::<ApiErrorResponse>(&body) {
            Ok(api_error) => {
                let message = api_error.error.message;
                match api_error.error.code.as_str() {
                    "not_found" => Err(ClientError::NotFound { message }),
                    "bad_request" => Err(ClientError::InvalidArgument { message }),
                    "conflict" => Err(ClientError::Conflict { message }),
                    code => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: String::from_utf8_lossy(&body).into_owned(),
                status: status.as_u16(),
            }),
        }
    }
}

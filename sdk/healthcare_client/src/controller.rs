//! Form controller: holds the input fields and the last fetched records, and
//! turns user actions into contract client calls.
//!
//! Each action moves through `Idle -> Submitted -> (Confirmed | Failed) -> Idle`.
//! Preconditions (connection, owner gate, input conversion) are checked
//! before `Submitted`, so a refused action goes straight to `Failed`.
//! Errors are logged and reported to observers; they are never retried.
//!
//! Actions take `&self` and run independently: a fetch may start and finish
//! while an add is still waiting for confirmation. Each action snapshots the
//! form fields when it starts. The controller is single-threaded.

use std::cell::RefCell;

use tracing::{error, info, warn};

use crate::address::{AccountId, ContractId};
use crate::client::RecordsClient;
use crate::display::render_records;
use crate::errors::ClientError;
use crate::gate::AuthorizationGate;
use crate::interface::{PatientId, PatientRecord};
use crate::network::{Receipt, RecordsNetwork};
use crate::wallet::{Session, WalletProvider};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    FetchRecords,
    AddRecord,
    AuthorizeProvider,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionState {
    Idle,
    Submitted,
    Confirmed,
    Failed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    PatientId,
    PatientName,
    Diagnosis,
    Treatment,
    ProviderAddress,
}

/// User-edited form values. Nothing is persisted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PendingInput {
    pub patient_id: String,
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: String,
    pub provider_address: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControllerEvent {
    Connected { account: AccountId, is_owner: bool },
    ConnectionFailed(ClientError),
    StatusChanged { action: Action, state: ActionState },
    RecordsUpdated { count: usize },
    Alert(String),
}

struct Connection<N> {
    session: Session,
    client: RecordsClient<N>,
    gate: AuthorizationGate,
}

pub struct FormController<N> {
    network: N,
    contract: ContractId,
    initialized: bool,
    connection: Option<Connection<N>>,
    input: RefCell<PendingInput>,
    records: RefCell<Vec<PatientRecord>>,
    observers: RefCell<Vec<Box<dyn FnMut(&ControllerEvent)>>>,
}

impl<N: RecordsNetwork + Clone> FormController<N> {
    pub fn new(network: N, contract: ContractId) -> Self {
        Self {
            network,
            contract,
            initialized: false,
            connection: None,
            input: RefCell::default(),
            records: RefCell::default(),
            observers: RefCell::default(),
        }
    }

    /// Registers a callback notified of every state change. Observers must
    /// not subscribe from inside a notification.
    pub fn subscribe(&self, observer: impl FnMut(&ControllerEvent) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    /// Connects the wallet session and derives the owner gate. Runs once;
    /// later calls do nothing. On failure the controller stays disconnected.
    pub async fn initialize<W: WalletProvider>(&mut self, wallet: Option<&W>) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        match self.connect(wallet).await {
            Ok(connection) => {
                let account = connection.session.account().clone();
                let is_owner = connection.gate.is_owner();
                info!(%account, is_owner, contract = %self.contract, "wallet connected");
                self.connection = Some(connection);
                self.emit(ControllerEvent::Connected { account, is_owner });
            }
            Err(err) => {
                error!(category = ?err.category(), error = %err, "error connecting to wallet");
                self.emit(ControllerEvent::ConnectionFailed(err));
            }
        }
    }

    async fn connect<W: WalletProvider>(
        &self,
        wallet: Option<&W>,
    ) -> Result<Connection<N>, ClientError> {
        let session = Session::connect(wallet).await?;
        let client = RecordsClient::new(
            self.network.clone(),
            self.contract.clone(),
            session.signer().clone(),
        );
        let owner = client.get_owner().await?;
        let gate = AuthorizationGate::derive(session.account(), &owner);
        Ok(Connection {
            session,
            client,
            gate,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|c| c.session.is_connected())
    }

    pub fn account(&self) -> Option<&AccountId> {
        self.connection.as_ref().map(|c| c.session.account())
    }

    /// `None` until a connection has been established.
    pub fn is_owner(&self) -> Option<bool> {
        self.connection.as_ref().map(|c| c.gate.is_owner())
    }

    pub fn client(&self) -> Option<&RecordsClient<N>> {
        self.connection.as_ref().map(|c| &c.client)
    }

    /// Current form values.
    pub fn input(&self) -> PendingInput {
        self.input.borrow().clone()
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let mut input = self.input.borrow_mut();
        match field {
            Field::PatientId => input.patient_id = value,
            Field::PatientName => input.patient_name = value,
            Field::Diagnosis => input.diagnosis = value,
            Field::Treatment => input.treatment = value,
            Field::ProviderAddress => input.provider_address = value,
        }
    }

    /// Records from the last successful fetch.
    pub fn records(&self) -> Vec<PatientRecord> {
        self.records.borrow().clone()
    }

    /// Replaces the record list with the contract's records for the entered
    /// patient id.
    pub async fn fetch_records(&self) -> ActionState {
        let action = Action::FetchRecords;
        let input = self.input();
        let outcome = match self.prepare_patient_id(&input) {
            Ok(patient_id) => {
                self.transition(action, ActionState::Submitted);
                self.read_records(patient_id).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(records) => {
                let count = records.len();
                self.records.replace(records);
                self.emit(ControllerEvent::RecordsUpdated { count });
                self.settle(action, Ok(()), "")
            }
            Err(err) => self.settle(action, Err(err), "error fetching patient records"),
        }
    }

    /// Submits the entered record and, once confirmed, refreshes the list.
    pub async fn add_record(&self) -> ActionState {
        let action = Action::AddRecord;
        let input = self.input();
        let outcome = match self.prepare_patient_id(&input) {
            Ok(patient_id) => {
                self.transition(action, ActionState::Submitted);
                self.submit_record(patient_id, &input).await
            }
            Err(err) => Err(err),
        };

        let state = self.settle(action, outcome.map(|_| ()), "error adding record");
        if state == ActionState::Confirmed {
            self.fetch_records().await;
        }
        state
    }

    /// Authorizes the entered provider address. Refused client-side unless
    /// the connected account owns the contract.
    pub async fn authorize_provider(&self) -> ActionState {
        let action = Action::AuthorizeProvider;
        let input = self.input();
        let outcome = match self.prepare_provider(&input) {
            Ok(provider) => {
                self.transition(action, ActionState::Submitted);
                let confirmed = self.submit_authorization(&provider).await;
                confirmed.map(|_| provider)
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(provider) => {
                self.emit(ControllerEvent::Alert(format!(
                    "Provider {provider} authorized successfully"
                )));
                self.settle(action, Ok(()), "")
            }
            Err(err) => self.settle(action, Err(err), "error authorizing provider"),
        }
    }

    /// Plain-text snapshot of what the view displays.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if let Some(account) = self.account() {
            lines.push(format!("Connected Account: {account}"));
        }
        if self.is_owner() == Some(true) {
            lines.push("You are the contract owner".to_string());
        }
        let records = render_records(&self.records.borrow());
        if !records.is_empty() {
            lines.push(records);
        }
        lines.join("\n")
    }

    fn connection(&self) -> Result<&Connection<N>, ClientError> {
        self.connection.as_ref().ok_or(ClientError::NotConnected)
    }

    fn prepare_patient_id(&self, input: &PendingInput) -> Result<PatientId, ClientError> {
        self.connection()?;
        PatientId::parse(&input.patient_id)
    }

    fn prepare_provider(&self, input: &PendingInput) -> Result<AccountId, ClientError> {
        self.connection()?.gate.check()?;
        AccountId::parse(&input.provider_address)
            .map_err(|err| ClientError::invalid("provider address", err.to_string()))
    }

    async fn read_records(&self, patient_id: PatientId) -> Result<Vec<PatientRecord>, ClientError> {
        self.connection()?
            .client
            .get_patient_records(patient_id)
            .await
    }

    async fn submit_record(
        &self,
        patient_id: PatientId,
        input: &PendingInput,
    ) -> Result<Receipt, ClientError> {
        let pending = self
            .connection()?
            .client
            .add_record(
                patient_id,
                &input.patient_name,
                &input.diagnosis,
                &input.treatment,
            )
            .await?;
        pending.wait().await
    }

    async fn submit_authorization(&self, provider: &AccountId) -> Result<Receipt, ClientError> {
        let pending = self
            .connection()?
            .client
            .authorized_provider(provider)
            .await?;
        pending.wait().await
    }

    /// Ends an action: reports the terminal state, then returns to `Idle`.
    fn settle(
        &self,
        action: Action,
        outcome: Result<(), ClientError>,
        context: &str,
    ) -> ActionState {
        let state = match outcome {
            Ok(()) => ActionState::Confirmed,
            Err(err) => {
                match err.alert() {
                    Some(alert) => {
                        warn!(?action, error = %err, "{context}");
                        self.emit(ControllerEvent::Alert(alert.to_string()));
                    }
                    None => error!(?action, category = ?err.category(), error = %err, "{context}"),
                }
                ActionState::Failed
            }
        };
        self.transition(action, state);
        self.transition(action, ActionState::Idle);
        state
    }

    fn transition(&self, action: Action, state: ActionState) {
        self.emit(ControllerEvent::StatusChanged { action, state });
    }

    fn emit(&self, event: ControllerEvent) {
        for observer in self.observers.borrow_mut().iter_mut() {
            observer(&event);
        }
    }
}

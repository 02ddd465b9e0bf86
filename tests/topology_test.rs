// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use aks_topology::cli::display::plan_rows;
use aks_topology::domain::config::{apply_overrides, parse_overrides, required_keys};
use aks_topology::domain::topology::SubnetRole;
use aks_topology::infrastructure::azure::resources::environment_taint;
use aks_topology::*;

mod test_utils {
    pub const STACK: &str = r#"
config:
  aks-topology:location: eastus
  aks-topology:resourceGroupName: aks-rg
  aks-topology:devNodePoolVMSize: Standard_D2s_v3
  aks-topology:stagingNodePoolVMSize: Standard_D4s_v3
  aks-topology:prodNodePoolVMSize: Standard_D8s_v3
  aks-topology:nodeCountDev: 1
  aks-topology:minCountDev: 1
  aks-topology:maxCountDev: 3
  aks-topology:nodeCountStaging: 2
  aks-topology:minCountStaging: 1
  aks-topology:maxCountStaging: 4
  aks-topology:nodeCountProd: 3
  aks-topology:minCountProd: 3
  aks-topology:maxCountProd: 10
  aks-topology:vnetCidr: 10.0.0.0/16
  aks-topology:systemSubnetCidr: 10.0.1.0/24
  aks-topology:devSubnetCidr: 10.0.2.0/24
  aks-topology:stagingSubnetCidr: 10.0.3.0/24
  aks-topology:prodSubnetCidr: 10.0.4.0/24
  azure-native:clientId: app-id
  azure-native:clientSecret: plain-text-secret-value
"#;

    pub const ENCRYPTED_SECRET: &str = "v1:AAAA:c2VjcmV0LWNpcGhlcnRleHQ=";

    pub fn stack() -> super::StackConfig {
        super::StackConfig::from_yaml_str(STACK, "aks-topology").unwrap()
    }

    pub fn topology() -> super::Topology {
        super::TopologyDescriptor::from_stack(&stack()).unwrap()
    }

    pub fn write_stack_file(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
        use std::io::Write;
        let path = dir.join("Pulumi.dev.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }
}

#[test]
fn test_every_missing_key_fails_before_declaration() {
    for key in required_keys() {
        let mut stack = test_utils::stack();
        assert!(stack.remove(&key).is_some(), "fixture is missing {}", key);

        let err = TopologyDescriptor::from_stack(&stack).unwrap_err();
        match err {
            TopologyError::MissingConfig { keys } => {
                assert_eq!(keys.len(), 1);
                assert!(keys[0].ends_with(&key), "{} not reported: {:?}", key, keys);
            }
            other => panic!("unexpected error for {}: {}", key, other),
        }
    }
}

#[test]
fn test_empty_stack_reports_all_keys() {
    let stack = StackConfig::from_yaml_str("", "aks-topology").unwrap();
    match TopologyDescriptor::from_stack(&stack).unwrap_err() {
        TopologyError::MissingConfig { keys } => assert_eq!(keys.len(), required_keys().len()),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_non_integer_count_is_rejected() {
    let mut stack = test_utils::stack();
    apply_overrides(
        &mut stack,
        &[("nodeCountProd".to_string(), "three".to_string())],
    )
    .unwrap();
    let err = TopologyDescriptor::from_stack(&stack).unwrap_err();
    assert!(err.to_string().contains("nodeCountProd"));
}

#[test]
fn test_system_pool_is_fixed() {
    let topology = test_utils::topology();
    let profiles = &topology.cluster.args.agent_pool_profiles;
    assert_eq!(profiles.len(), 1);

    let system = &profiles[0];
    assert_eq!(system.name, "systempool");
    assert_eq!(system.mode.as_str(), "System");
    assert_eq!(system.vm_size, "Standard_D4s_v3");
    assert_eq!(system.count, 1);
    assert_eq!(system.min_count, 1);
    assert_eq!(system.max_count, 1);
    assert_eq!(system.max_pods, 110);
    assert!(system.enable_auto_scaling);
    assert_eq!(system.node_taints, vec!["CriticalAddonsOnly=true:NoExecute"]);
}

#[test]
fn test_environment_pools_follow_configuration() {
    let topology = test_utils::topology();
    let expected = [
        (Environment::Dev, "devpool", "Standard_D2s_v3", 1, 1, 3),
        (Environment::Staging, "stagingpool", "Standard_D4s_v3", 2, 1, 4),
        (Environment::Prod, "prodpool", "Standard_D8s_v3", 3, 3, 10),
    ];

    for (env, name, vm_size, count, min, max) in expected {
        let pool = topology.node_pool(env).unwrap();
        assert_eq!(pool.logical_name, name);
        assert_eq!(pool.args.agent_pool_name, name);
        assert_eq!(pool.args.vm_size, vm_size);
        assert_eq!(pool.args.count, count);
        assert_eq!(pool.args.min_count, min);
        assert_eq!(pool.args.max_count, max);
        assert!(pool.args.min_count <= pool.args.count);
        assert!(pool.args.count <= pool.args.max_count);
        assert_eq!(pool.args.mode.as_str(), "User");
        assert_eq!(pool.args.node_labels["environment"], env.as_str());
    }
}

#[test]
fn test_environment_taints() {
    assert_eq!(environment_taint(Environment::Dev), "environment=dev:NoExecute");
    assert_eq!(
        environment_taint(Environment::Staging),
        "environment=staging:NoExecute"
    );
    assert_eq!(environment_taint(Environment::Prod), "environment=prod:NoExecute");

    let topology = test_utils::topology();
    for env in Environment::ALL {
        assert_eq!(
            topology.node_pool(env).unwrap().args.node_taints,
            vec![environment_taint(env)]
        );
    }
}

#[test]
fn test_subnets_inside_vnet_and_disjoint() {
    let topology = test_utils::topology();
    let vnet: Ipv4Cidr = topology.virtual_network.args.address_space.address_prefixes[0]
        .parse()
        .unwrap();
    let subnets: Vec<Ipv4Cidr> = SubnetRole::ALL
        .iter()
        .map(|role| {
            topology
                .subnet(*role)
                .unwrap()
                .args
                .address_prefix
                .parse()
                .unwrap()
        })
        .collect();

    for (i, subnet) in subnets.iter().enumerate() {
        assert!(vnet.strictly_contains(subnet), "{} not inside {}", subnet, vnet);
        for other in &subnets[i + 1..] {
            assert!(!subnet.overlaps(other), "{} overlaps {}", subnet, other);
        }
    }
}

#[test]
fn test_reference_layout_passes_preflight() {
    let config = TopologyConfig::from_stack(&test_utils::stack()).unwrap();
    let report = TopologyValidator::new().unwrap().validate(&config);
    assert!(!report.has_errors(), "{:?}", report.findings());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_overlapping_subnets_fail_preflight() {
    let mut stack = test_utils::stack();
    let overrides = parse_overrides(&["stagingSubnetCidr=10.0.2.128/25".to_string()]).unwrap();
    apply_overrides(&mut stack, &overrides).unwrap();

    let config = TopologyConfig::from_stack(&stack).unwrap();
    let report = TopologyValidator::new().unwrap().validate(&config);
    assert!(report.has_errors());
    assert!(report.into_result().is_err());

    // Rendering does not second-guess the provider
    assert!(TopologyDescriptor::from_stack(&stack).is_ok());
}

#[test]
fn test_render_is_idempotent() {
    let first = test_utils::topology()
        .to_program("aks-topology")
        .unwrap()
        .render(OutputFormat::Yaml)
        .unwrap();
    let second = test_utils::topology()
        .to_program("aks-topology")
        .unwrap()
        .render(OutputFormat::Yaml)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_secret_never_rendered() {
    let program = test_utils::topology().to_program("aks-topology").unwrap();
    for format in [OutputFormat::Yaml, OutputFormat::Json] {
        let rendered = program.render(format).unwrap();
        assert!(!rendered.contains("plain-text-secret-value"));
        assert!(rendered.contains("${azure-native:clientSecret}"));
    }

    for row in plan_rows(&test_utils::topology()) {
        assert!(!row.details.contains("plain-text-secret-value"));
    }
}

#[test]
fn test_encrypted_secret_is_accepted() {
    let content = test_utils::STACK.replace(
        "azure-native:clientSecret: plain-text-secret-value",
        &format!(
            "azure-native:clientSecret:\n    secure: {}",
            test_utils::ENCRYPTED_SECRET
        ),
    );
    let stack = StackConfig::from_yaml_str(&content, "aks-topology").unwrap();
    let config = TopologyConfig::from_stack(&stack).unwrap();
    assert!(config.service_principal.client_secret.is_encrypted());

    let rendered = TopologyDescriptor::declare(&config)
        .to_program("aks-topology")
        .unwrap()
        .to_yaml()
        .unwrap();
    assert!(!rendered.contains(test_utils::ENCRYPTED_SECRET));
}

#[test]
fn test_rendered_program_structure() {
    let program = test_utils::topology().to_program("aks-topology").unwrap();
    let json: serde_json::Value = serde_json::from_str(&program.to_json().unwrap()).unwrap();

    assert_eq!(json["name"], "aks-topology");
    assert_eq!(json["runtime"], "yaml");
    assert_eq!(json["config"]["azure-native:clientSecret"]["secret"], true);
    assert!(json["config"]["azure-native:clientSecret"].get("type").is_none());

    let resources = &json["resources"];
    assert_eq!(resources.as_object().unwrap().len(), 10);
    assert_eq!(
        resources["aksCluster"]["type"],
        "azure-native:containerservice:ManagedCluster"
    );

    let cluster = &resources["aksCluster"]["properties"];
    assert_eq!(cluster["dnsPrefix"], "AKS-Cluster-CWY");
    assert_eq!(cluster["networkProfile"]["networkPlugin"], "azure");
    assert_eq!(cluster["networkProfile"]["dnsServiceIP"], "10.0.10.10");
    assert_eq!(cluster["networkProfile"]["serviceCidr"], "10.0.10.0/24");
    assert_eq!(cluster["networkProfile"]["dockerBridgeCidr"], "172.17.0.1/16");
    assert_eq!(cluster["servicePrincipalProfile"]["clientId"], "app-id");
    assert_eq!(
        cluster["agentPoolProfiles"][0]["vnetSubnetID"],
        "${systemSubnet.id}"
    );

    let prod = &resources["prodpool"]["properties"];
    assert_eq!(prod["resourceName"], "${aksCluster.name}");
    assert_eq!(prod["vnetSubnetID"], "${prodSubnet.id}");
    assert_eq!(prod["nodeTaints"][0], "environment=prod:NoExecute");

    assert_eq!(json["outputs"]["devSubnetId"], "${devSubnet.id}");
    assert_eq!(json["outputs"]["resourceGroupName"], "${aks-rg.name}");
}

#[test]
fn test_overrides_win_over_stack_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = test_utils::write_stack_file(dir.path(), test_utils::STACK);

    let mut stack = StackConfig::from_file(&path, "aks-topology").unwrap();
    let overrides = parse_overrides(&[
        "nodeCountDev=2".to_string(),
        "location=westeurope".to_string(),
    ])
    .unwrap();
    apply_overrides(&mut stack, &overrides).unwrap();

    let topology = TopologyDescriptor::from_stack(&stack).unwrap();
    assert_eq!(topology.node_pool(Environment::Dev).unwrap().args.count, 2);
    assert_eq!(topology.resource_group.args.location, "westeurope");
    assert_eq!(topology.cluster.args.location, "westeurope");
}

#[test]
fn test_secret_override_cannot_stand_in_for_stack_file() {
    let mut stack = test_utils::stack();
    stack.remove("azure-native:clientSecret");
    assert!(matches!(
        TopologyDescriptor::from_stack(&stack),
        Err(TopologyError::MissingConfig { .. })
    ));

    let overrides =
        parse_overrides(&["azure-native:clientSecret=override-secret".to_string()]).unwrap();
    let err = apply_overrides(&mut stack, &overrides).unwrap_err();
    assert!(matches!(err, TopologyError::ConfigError(_)));
    assert!(!err.to_string().contains("override-secret"));

    // Still missing, so nothing gets handed to the engine
    match TopologyDescriptor::from_stack(&stack).unwrap_err() {
        TopologyError::MissingConfig { keys } => {
            assert_eq!(keys, vec!["azure-native:clientSecret".to_string()])
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_write_program_to_dir() {
    let dir = tempfile::tempdir().unwrap();
    let program = test_utils::topology().to_program("aks-topology").unwrap();
    let path = program.write_to_dir(dir.path()).await.unwrap();

    assert!(path.ends_with("Pulumi.yaml"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, program.to_yaml().unwrap());

    // Rewriting the same program leaves the file unchanged
    program.write_to_dir(dir.path()).await.unwrap();
    let again = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, again);
}
